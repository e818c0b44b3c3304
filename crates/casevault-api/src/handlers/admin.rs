use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use casevault_core::models::CaseSummaryResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/admin/cases",
    tag = "admin",
    responses(
        (status = 200, description = "Every case with container and file aggregates", body = CaseSummaryResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_cases_with_summary"))]
pub async fn list_cases_with_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CaseSummaryResponse>, HttpAppError> {
    let cases = state.services.admin.list_cases_with_summary().await?;
    Ok(Json(CaseSummaryResponse { cases }))
}
