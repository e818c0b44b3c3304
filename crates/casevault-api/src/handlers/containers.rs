use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use casevault_core::models::{Container, ContainerListResponse, ProvisionContainerRequest};
use std::sync::Arc;

/// Provision (or fetch) the container of a (case, connection token) pair.
/// Omitting the token provisions under a freshly generated one.
#[utoipa::path(
    post,
    path = "/api/v0/cases/{case}/containers",
    tag = "containers",
    params(("case" = String, Path, description = "Case name")),
    request_body = ProvisionContainerRequest,
    responses(
        (status = 200, description = "Container for the pair", body = Container),
        (status = 400, description = "Malformed connection token", body = ErrorResponse),
        (status = 404, description = "Unknown case", body = ErrorResponse),
        (status = 409, description = "Case is archived", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "provision_container"))]
pub async fn provision_container(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
    ValidatedJson(request): ValidatedJson<ProvisionContainerRequest>,
) -> Result<Json<Container>, HttpAppError> {
    let container = state
        .services
        .provisioner
        .provision(&case, request.connection_token.as_deref())
        .await?;
    Ok(Json(container))
}

#[utoipa::path(
    get,
    path = "/api/v0/cases/{case}/containers",
    tag = "containers",
    params(("case" = String, Path, description = "Case name")),
    responses(
        (status = 200, description = "Containers in creation order", body = ContainerListResponse),
        (status = 404, description = "Unknown case", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_containers"))]
pub async fn list_containers(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
) -> Result<Json<ContainerListResponse>, HttpAppError> {
    let containers = state.services.provisioner.list_containers(&case).await?;
    Ok(Json(ContainerListResponse { containers }))
}
