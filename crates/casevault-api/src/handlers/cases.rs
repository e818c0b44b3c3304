use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use casevault_core::models::{Case, CaseListItem, CaseListResponse, CreateCaseRequest};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/v0/cases",
    tag = "cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = Case),
        (status = 400, description = "Invalid case name", body = ErrorResponse),
        (status = 409, description = "Case name already exists", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_case"))]
pub async fn create_case(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCaseRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let case = state.services.registry.create_case(&request.name).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

#[utoipa::path(
    get,
    path = "/api/v0/cases",
    tag = "cases",
    responses(
        (status = 200, description = "Cases in creation order", body = CaseListResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_cases"))]
pub async fn list_cases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CaseListResponse>, HttpAppError> {
    let cases = state.services.registry.list_cases().await?;
    Ok(Json(CaseListResponse {
        cases: cases.into_iter().map(CaseListItem::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v0/cases/{case}",
    tag = "cases",
    params(("case" = String, Path, description = "Case name")),
    responses(
        (status = 200, description = "Case", body = Case),
        (status = 404, description = "Unknown case", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_case"))]
pub async fn get_case(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
) -> Result<Json<Case>, HttpAppError> {
    Ok(Json(state.services.registry.get_case(&case).await?))
}

#[utoipa::path(
    post,
    path = "/api/v0/cases/{case}/archive",
    tag = "cases",
    params(("case" = String, Path, description = "Case name")),
    responses(
        (status = 200, description = "Case archived", body = Case),
        (status = 404, description = "Unknown case", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "archive_case"))]
pub async fn archive_case(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
) -> Result<Json<Case>, HttpAppError> {
    Ok(Json(state.services.registry.archive_case(&case).await?))
}
