//! Error types module
//!
//! This module provides the core error types used throughout CaseVault.
//! All errors are unified under the `AppError` enum, which carries both the
//! domain failure kinds of the case/container/file model and the
//! infrastructure failures (database, internal) that can surface underneath.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like storage hiccups
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DUPLICATE_NAME")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (the same request can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid case name: {0}")]
    InvalidName(String),

    #[error("Case name already exists: {0}")]
    DuplicateName(String),

    #[error("Unknown case: {0}")]
    UnknownCase(String),

    #[error("Case is archived: {0}")]
    CaseArchived(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous target: {0}")]
    Ambiguous(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidName(_) => (
            400,
            "INVALID_NAME",
            false,
            Some("Use a non-empty name made of letters, digits, spaces, '.', '-' or '_'"),
            false,
            LogLevel::Debug,
        ),
        AppError::DuplicateName(_) => (
            409,
            "DUPLICATE_NAME",
            false,
            Some("Choose a different case name"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnknownCase(_) => (
            404,
            "UNKNOWN_CASE",
            false,
            Some("Verify the case name exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::CaseArchived(_) => (
            409,
            "CASE_ARCHIVED",
            false,
            Some("Archived cases accept no new uploads"),
            false,
            LogLevel::Debug,
        ),
        AppError::Validation(_) => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Fix the rejected files and resubmit the batch"),
            false,
            LogLevel::Debug,
        ),
        AppError::StorageFailure(_) => (
            503,
            "STORAGE_FAILURE",
            true,
            Some("Retry the same request after a short delay"),
            true,
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the file name exists in the case"),
            false,
            LogLevel::Debug,
        ),
        AppError::Ambiguous(_) => (
            409,
            "AMBIGUOUS",
            false,
            Some("Repeat the request with a connection_token to pick one container"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidName(_) => "InvalidName",
            AppError::DuplicateName(_) => "DuplicateName",
            AppError::UnknownCase(_) => "UnknownCase",
            AppError::CaseArchived(_) => "CaseArchived",
            AppError::Validation(_) => "ValidationError",
            AppError::StorageFailure(_) => "StorageFailure",
            AppError::NotFound(_) => "NotFound",
            AppError::Ambiguous(_) => "Ambiguous",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidName(ref msg) => format!("Invalid case name: {}", msg),
            AppError::DuplicateName(ref name) => format!("Case '{}' already exists", name),
            AppError::UnknownCase(ref name) => format!("Case '{}' does not exist", name),
            AppError::CaseArchived(ref name) => format!("Case '{}' is archived", name),
            AppError::Validation(ref msg) => msg.clone(),
            AppError::StorageFailure(_) => "Failed to access blob storage".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Ambiguous(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
