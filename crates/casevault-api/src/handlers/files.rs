use crate::constants::{CONNECTION_TOKEN_FIELD, FILE_FIELD, LEGACY_CONNECTION_TOKEN_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use casevault_core::models::{FileListResponse, FileOutcome, UploadResult};
use casevault_core::AppError;
use casevault_services::IncomingFile;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FileTargetQuery {
    /// Restrict the lookup to the container of this connection token
    pub connection_token: Option<String>,
}

/// Files and connection token read from an upload form
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub connection_token: Option<String>,
    pub files: Vec<IncomingFile>,
}

/// Read every `file` field plus the connection token from a multipart body.
///
/// `connectionId` is honoured as a deprecated alias when `accept_legacy_alias`
/// is set; an explicit `connection_token` wins over it.
pub(crate) async fn read_upload_form(
    mut multipart: Multipart,
    accept_legacy_alias: bool,
) -> Result<UploadForm, HttpAppError> {
    let mut form = UploadForm::default();
    let mut legacy_token: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FILE_FIELD => {
                let filename = field.file_name().map(|s| s.to_string()).ok_or_else(|| {
                    AppError::InvalidInput("Every file field needs a filename".to_string())
                })?;
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await?;
                form.files.push(IncomingFile {
                    filename,
                    content_type,
                    data,
                });
            }
            CONNECTION_TOKEN_FIELD => {
                form.connection_token = Some(field.text().await?);
            }
            LEGACY_CONNECTION_TOKEN_FIELD if accept_legacy_alias => {
                tracing::warn!(
                    field = LEGACY_CONNECTION_TOKEN_FIELD,
                    "Deprecated multipart field used; send connection_token instead"
                );
                legacy_token = Some(field.text().await?);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    if form.connection_token.is_none() {
        form.connection_token = legacy_token;
    }
    Ok(form)
}

/// 201 when every file is stored, 503 when nothing is stored and every
/// failure is a storage outage, 500 for any other total failure, else 207.
pub(crate) fn upload_status(result: &UploadResult) -> StatusCode {
    let stored = result.stored_count();
    if stored == result.files.len() {
        StatusCode::CREATED
    } else if stored > 0 {
        StatusCode::MULTI_STATUS
    } else if result.files.iter().all(|f| {
        matches!(f, FileOutcome::Failed { code, .. } if code == "STORAGE_FAILURE")
    }) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/cases/{case}/files",
    tag = "files",
    params(("case" = String, Path, description = "Case name")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "All files stored", body = UploadResult),
        (status = 207, description = "Some files failed; see per-file outcomes", body = UploadResult),
        (status = 400, description = "Batch rejected, nothing stored", body = ErrorResponse),
        (status = 404, description = "Unknown case", body = ErrorResponse),
        (status = 409, description = "Case is archived", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = UploadResult)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_files"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_upload_form(multipart, state.config.legacy_compat_enabled()).await?;

    let result = state
        .services
        .ingestion
        .upload(&case, form.connection_token.as_deref(), form.files)
        .await?;

    Ok((upload_status(&result), Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/v0/cases/{case}/files",
    tag = "files",
    params(("case" = String, Path, description = "Case name")),
    responses(
        (status = 200, description = "Files in upload order", body = FileListResponse),
        (status = 404, description = "Unknown case", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_files"))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Path(case): Path<String>,
) -> Result<Json<FileListResponse>, HttpAppError> {
    let files = state.services.files.list_files(&case).await?;
    Ok(Json(FileListResponse { files }))
}

#[utoipa::path(
    get,
    path = "/api/v0/cases/{case}/files/{name}",
    tag = "files",
    params(
        ("case" = String, Path, description = "Case name"),
        ("name" = String, Path, description = "File name"),
        FileTargetQuery
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown case or file", body = ErrorResponse),
        (status = 409, description = "Name exists in several containers", body = ErrorResponse),
        (status = 503, description = "Blob storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path((case, name)): Path<(String, String)>,
    Query(query): Query<FileTargetQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (file, data) = state
        .services
        .files
        .download_file(&case, &name, query.connection_token.as_deref())
        .await?;

    tracing::debug!(
        file = %file.name,
        container = %file.container_name,
        size_bytes = data.len(),
        "Serving file from storage"
    );

    let content_disposition = format!("attachment; filename=\"{}\"", file.name);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type.as_str())
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

#[utoipa::path(
    delete,
    path = "/api/v0/cases/{case}/files/{name}",
    tag = "files",
    params(
        ("case" = String, Path, description = "Case name"),
        ("name" = String, Path, description = "File name"),
        FileTargetQuery
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "Unknown case or file", body = ErrorResponse),
        (status = 409, description = "Name exists in several containers", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_file"))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((case, name)): Path<(String, String)>,
    Query(query): Query<FileTargetQuery>,
) -> Result<StatusCode, HttpAppError> {
    state
        .services
        .files
        .delete_file(&case, &name, query.connection_token.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
