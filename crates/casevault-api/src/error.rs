//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>` and use `?`
//! on anything that converts into `AppError`, so every failure renders with the
//! same status, body and log level.

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use casevault_core::{AppError, ErrorMetadata, LogLevel};
use casevault_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use utoipa::ToSchema;

/// Whether error bodies may carry `details` and `error_type`.
static EXPOSE_ERROR_DETAILS: AtomicBool = AtomicBool::new(true);

/// Applied once while building the router, from `Config::is_production`.
pub fn set_production_mode(production: bool) {
    EXPOSE_ERROR_DETAILS.store(!production, Ordering::Relaxed);
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether the same request can be retried
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(err: &AppError, include_details: bool) -> Self {
        Self {
            error: err.client_message(),
            details: include_details.then(|| err.detailed_message()),
            error_type: include_details.then(|| err.error_type().to_string()),
            code: err.error_code().to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError both live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<FormRejection> for HttpAppError {
    fn from(rejection: FormRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid form body: {}",
            rejection.body_text()
        )))
    }
}

impl From<axum::extract::multipart::MultipartError> for HttpAppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Failed to read multipart body: {}",
            err.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = ?error, error_type = error_type, "Error occurred");
        }
    }
}

fn exposes_details(err: &AppError) -> bool {
    EXPOSE_ERROR_DETAILS.load(Ordering::Relaxed) && !err.is_sensitive()
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production and only for non-sensitive errors.
        let body = ErrorResponse::from_app_error(app_error, exposes_details(app_error));

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let HttpAppError(app_err) = StorageError::NotFound("case-1/a.txt".to_string()).into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let HttpAppError(app_err) = StorageError::UploadFailed("disk".to_string()).into();
        assert!(matches!(app_err, AppError::StorageFailure(_)));
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let HttpAppError(app_err) = StorageError::InvalidKey("..".to_string()).into();
        assert!(matches!(app_err, AppError::Validation(_)));
    }

    #[test]
    fn test_status_codes_follow_metadata() {
        let cases = [
            (AppError::InvalidName("x".into()), StatusCode::BAD_REQUEST),
            (AppError::DuplicateName("x".into()), StatusCode::CONFLICT),
            (AppError::UnknownCase("x".into()), StatusCode::NOT_FOUND),
            (AppError::Ambiguous("x".into()), StatusCode::CONFLICT),
            (AppError::StorageFailure("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpAppError(err).into_response().status(), expected);
        }
    }

    /// Serialized ErrorResponse has "error", "code", "recoverable", and optionally
    /// "details" / "error_type" / "suggested_action".
    #[test]
    fn test_error_response_shape() {
        let err = AppError::DuplicateName("alpha".to_string());
        let json = serde_json::to_value(ErrorResponse::from_app_error(&err, true)).unwrap();
        assert_eq!(json["code"], "DUPLICATE_NAME");
        assert_eq!(json["recoverable"], false);
        assert!(json["error"].as_str().unwrap().contains("alpha"));
        assert!(json.get("details").is_some());

        let hidden = serde_json::to_value(ErrorResponse::from_app_error(&err, false)).unwrap();
        assert!(hidden.get("details").is_none());
        assert!(hidden.get("error_type").is_none());
    }

    #[test]
    fn test_production_mode_hides_details() {
        let err = AppError::DuplicateName("alpha".to_string());
        assert!(exposes_details(&err));

        set_production_mode(true);
        let hidden = exposes_details(&err);
        set_production_mode(false);

        assert!(!hidden);
        assert!(exposes_details(&err));
    }
}
