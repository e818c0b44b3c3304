use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Containers are directories under `base_path`; blobs are files inside them.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path` (e.g. "/var/lib/casevault/blobs")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        let (container, blob_name) = keys::split_key(storage_key)?;
        keys::validate_segment(container, "container name")?;
        keys::validate_segment(blob_name, "blob name")?;
        Ok(self.base_path.join(container).join(blob_name))
    }

    fn container_path(&self, container: &str) -> StorageResult<PathBuf> {
        keys::validate_segment(container, "container name")?;
        Ok(self.base_path.join(container))
    }

    /// Temp file next to the target so the final rename stays on one filesystem
    fn partial_path(target: &Path) -> PathBuf {
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        target.with_file_name(format!(".{}.{}.partial", file_name, Uuid::new_v4()))
    }

    async fn write_atomically(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let partial = Self::partial_path(path);

        let result = async {
            let mut file = fs::File::create(&partial).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    partial.display(),
                    e
                ))
            })?;
            file.write_all(data).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write file {}: {}",
                    partial.display(),
                    e
                ))
            })?;
            file.sync_all().await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to sync file {}: {}",
                    partial.display(),
                    e
                ))
            })?;
            fs::rename(&partial, path).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to move {} into place: {}",
                    path.display(),
                    e
                ))
            })
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&partial).await;
        }
        result
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn create_container(&self, container: &str) -> StorageResult<()> {
        let path = self.container_path(container)?;
        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::BackendError(format!(
                "Failed to create container {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(container = %container, path = %path.display(), "Local container ready");
        Ok(())
    }

    async fn put_blob(
        &self,
        container: &str,
        blob_name: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let key = keys::blob_key(container, blob_name)?;
        let path = self.key_to_path(&key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        self.write_atomically(&path, &data).await?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(key)
    }

    async fn get_blob(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn delete_blob(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), key = %storage_key, "Local storage delete successful");
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await?;
        if !meta.is_dir() {
            return Err(StorageError::BackendError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
