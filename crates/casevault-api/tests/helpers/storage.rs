//! Storage doubles for failure scenarios.

use async_trait::async_trait;
use bytes::Bytes;
use casevault_storage::{MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Memory storage that rejects writes of blobs named `fail*`, and every
/// operation while `down` is set.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    pub inner: MemoryStorage,
    pub down: Arc<AtomicBool>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(StorageError::BackendError("storage offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn create_container(&self, container: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.create_container(container).await
    }

    async fn put_blob(
        &self,
        container: &str,
        blob_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        self.check()?;
        if blob_name.starts_with("fail") {
            return Err(StorageError::UploadFailed("simulated outage".to_string()));
        }
        self.inner
            .put_blob(container, blob_name, content_type, data)
            .await
    }

    async fn get_blob(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.check()?;
        self.inner.get_blob(storage_key).await
    }

    async fn delete_blob(&self, storage_key: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.delete_blob(storage_key).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.check()?;
        self.inner.exists(storage_key).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.check()
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
