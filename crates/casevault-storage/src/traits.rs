//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use casevault_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Blob '{}' not found", key)),
            StorageError::InvalidKey(msg) => AppError::Validation(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::StorageFailure(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// All blob backends implement this trait so the services work with any backend
/// without coupling to its details.
///
/// **Key format:** `{container}/{blob_name}`. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a container. Creating an existing container succeeds.
    async fn create_container(&self, container: &str) -> StorageResult<()>;

    /// Write a blob and return its storage key.
    ///
    /// The write is all-or-nothing: readers observe either the previous
    /// content under that key or the complete new content, never a prefix.
    /// An existing blob with the same name is replaced.
    async fn put_blob(
        &self,
        container: &str,
        blob_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Read a blob by its storage key
    async fn get_blob(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob by its storage key. Deleting a missing blob succeeds.
    async fn delete_blob(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a blob exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Cheap liveness probe used by readiness checks
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
