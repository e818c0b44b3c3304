//! Deprecated request shapes still sent by older clients.
//!
//! Mounted only when `LEGACY_COMPAT_ENABLED` is set. Every deprecated
//! response carries `Deprecation: true` and every such call is logged at warn
//! level. Each route delegates to the same services as its canonical
//! counterpart.
//!
//! The delete-intent path sits inside the canonical `files/{name}` namespace,
//! so GET and DELETE on it are forwarded to the canonical handlers for a file
//! literally named `delete`.

use crate::constants::API_PREFIX;
use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::files::{self, FileTargetQuery};
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, Path, Query, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use casevault_core::models::DeleteFileRequest;
use casevault_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub const DEPRECATION_HEADER: HeaderName = HeaderName::from_static("deprecation");

/// File name shadowed by the delete-intent route
const DELETE_INTENT_SEGMENT: &str = "delete";

#[derive(Debug, Deserialize)]
pub struct LegacyCreateCaseForm {
    #[serde(default)]
    pub case_name: String,
}

/// Bare listing entry of the old per-case file view
#[derive(Debug, Serialize)]
pub struct LegacyFileEntry {
    pub name: String,
    pub size: i64,
}

pub fn legacy_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let deprecated = || axum::middleware::from_fn(deprecation_middleware);

    Router::new()
        .route("/admin", post(create_case_form).route_layer(deprecated()))
        .route("/admin/", post(create_case_form).route_layer(deprecated()))
        .route(
            "/case/{case}/files",
            get(list_files_bare).route_layer(deprecated()),
        )
        // route_layer only wraps the methods registered before it
        .route(
            &format!(
                "{}/cases/{{case}}/files/{}",
                API_PREFIX, DELETE_INTENT_SEGMENT
            ),
            post(delete_file_post)
                .route_layer(deprecated())
                .get(download_file_named_delete)
                .delete(delete_file_named_delete),
        )
        .with_state(state)
}

async fn deprecation_middleware(request: Request, next: Next) -> Response {
    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "Deprecated endpoint called"
    );
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(DEPRECATION_HEADER, HeaderValue::from_static("true"));
    response
}

/// Form-encoded case creation of the old admin portal
async fn create_case_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<LegacyCreateCaseForm>, FormRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Form(form) = form?;
    let case = state.services.registry.create_case(&form.case_name).await?;
    Ok((
        StatusCode::CREATED,
        format!("Case '{}' created.", case.name),
    ))
}

/// `[ {name, size} ]` instead of `{ "files": [...] }`
async fn list_files_bare(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
) -> Result<Json<Vec<LegacyFileEntry>>, HttpAppError> {
    let files = state.services.files.list_files(&case).await?;
    Ok(Json(
        files
            .into_iter()
            .map(|f| LegacyFileEntry {
                name: f.name,
                size: f.size_bytes,
            })
            .collect(),
    ))
}

/// POST-with-delete-intent variant of `DELETE /cases/{case}/files/{name}`
async fn delete_file_post(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
    ValidatedJson(request): ValidatedJson<DeleteFileRequest>,
) -> Result<StatusCode, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    state
        .services
        .files
        .delete_file(&case, &request.name, request.connection_token.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn download_file_named_delete(
    state: State<Arc<AppState>>,
    Path(case): Path<String>,
    query: Query<FileTargetQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    files::download_file(
        state,
        Path((case, DELETE_INTENT_SEGMENT.to_string())),
        query,
    )
    .await
}

async fn delete_file_named_delete(
    state: State<Arc<AppState>>,
    Path(case): Path<String>,
    query: Query<FileTargetQuery>,
) -> Result<StatusCode, HttpAppError> {
    files::delete_file(
        state,
        Path((case, DELETE_INTENT_SEGMENT.to_string())),
        query,
    )
    .await
}
