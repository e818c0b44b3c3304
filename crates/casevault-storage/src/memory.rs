use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process blob storage for development and tests.
///
/// Each write swaps a whole `Bytes` value under the lock, so it is atomic.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    containers: Arc<RwLock<HashMap<String, HashMap<String, Bytes>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held across all containers
    pub async fn blob_count(&self) -> usize {
        self.containers.read().await.values().map(HashMap::len).sum()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_container(&self, container: &str) -> StorageResult<()> {
        keys::validate_segment(container, "container name")?;
        self.containers
            .write()
            .await
            .entry(container.to_string())
            .or_default();
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
        self.containers
            .write()
            .await
            .entry(container.to_string())
            .or_default()
            .insert(blob_name.to_string(), data);
        Ok(key)
    }

    async fn get_blob(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let (container, blob_name) = keys::split_key(storage_key)?;
        self.containers
            .read()
            .await
            .get(container)
            .and_then(|blobs| blobs.get(blob_name))
            .map(|data| data.to_vec())
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete_blob(&self, storage_key: &str) -> StorageResult<()> {
        let (container, blob_name) = keys::split_key(storage_key)?;
        if let Some(blobs) = self.containers.write().await.get_mut(container) {
            blobs.remove(blob_name);
        }
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let (container, blob_name) = keys::split_key(storage_key)?;
        Ok(self
            .containers
            .read()
            .await
            .get(container)
            .is_some_and(|blobs| blobs.contains_key(blob_name)))
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
