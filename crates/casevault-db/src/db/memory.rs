//! In-memory repository backing `DATABASE_URL=memory://`.
//!
//! All three repository traits share one store behind a single lock, so
//! every mutation is one critical section and the uniqueness rules hold
//! under concurrent callers.

use crate::db::{BlobRepository, CaseRepository, ContainerRepository};
use casevault_core::models::{Case, CaseStatus, Container, FileDescriptor, NewBlob};
use casevault_core::AppError;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    cases: Vec<Case>,
    containers: Vec<Container>,
    blobs: Vec<FileDescriptor>,
    next_upload_seq: i64,
}

impl MemoryState {
    fn container_ids_for_case(&self, case_id: Uuid) -> Vec<Uuid> {
        self.containers
            .iter()
            .filter(|c| c.case_id == case_id)
            .map(|c| c.id)
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CaseRepository for MemoryRepository {
    async fn insert_case(&self, name: &str) -> Result<Case, AppError> {
        let mut state = self.state.write().await;
        if state.cases.iter().any(|c| c.name == name) {
            return Err(AppError::DuplicateName(name.to_string()));
        }
        let case = Case {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: CaseStatus::Active,
            created_at: Utc::now(),
        };
        state.cases.push(case.clone());
        Ok(case)
    }

    async fn list_cases(&self) -> Result<Vec<Case>, AppError> {
        Ok(self.state.read().await.cases.clone())
    }

    async fn find_case(&self, name: &str) -> Result<Option<Case>, AppError> {
        Ok(self
            .state
            .read()
            .await
            .cases
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn archive_case(&self, name: &str) -> Result<Option<Case>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.cases.iter_mut().find(|c| c.name == name).map(|case| {
            case.status = CaseStatus::Archived;
            case.clone()
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContainerRepository for MemoryRepository {
    async fn claim_container(
        &self,
        case_id: Uuid,
        connection_token: &str,
        name: &str,
    ) -> Result<Container, AppError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .containers
            .iter()
            .find(|c| c.case_id == case_id && c.connection_token == connection_token)
        {
            return Ok(existing.clone());
        }
        let container = Container {
            id: Uuid::new_v4(),
            case_id,
            connection_token: connection_token.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.containers.push(container.clone());
        Ok(container)
    }

    async fn list_containers(&self, case_id: Uuid) -> Result<Vec<Container>, AppError> {
        Ok(self
            .state
            .read()
            .await
            .containers
            .iter()
            .filter(|c| c.case_id == case_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BlobRepository for MemoryRepository {
    async fn upsert_blob(&self, blob: NewBlob) -> Result<FileDescriptor, AppError> {
        let mut state = self.state.write().await;
        let container = state
            .containers
            .iter()
            .find(|c| c.id == blob.container_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(format!("Container {} does not exist", blob.container_id))
            })?;

        state.next_upload_seq += 1;
        let upload_seq = state.next_upload_seq;
        let uploaded_at = Utc::now();

        if let Some(existing) = state
            .blobs
            .iter_mut()
            .find(|b| b.container_id == blob.container_id && b.name == blob.name)
        {
            existing.size_bytes = blob.size_bytes;
            existing.content_type = blob.content_type;
            existing.storage_key = blob.storage_key;
            existing.uploaded_at = uploaded_at;
            existing.upload_seq = upload_seq;
            return Ok(existing.clone());
        }

        let descriptor = FileDescriptor {
            id: Uuid::new_v4(),
            name: blob.name,
            size_bytes: blob.size_bytes,
            content_type: blob.content_type,
            container_id: container.id,
            container_name: container.name,
            connection_token: container.connection_token,
            storage_key: blob.storage_key,
            uploaded_at,
            upload_seq,
        };
        state.blobs.push(descriptor.clone());
        Ok(descriptor)
    }

    async fn list_blobs_for_case(&self, case_id: Uuid) -> Result<Vec<FileDescriptor>, AppError> {
        let state = self.state.read().await;
        let container_ids = state.container_ids_for_case(case_id);
        let mut blobs: Vec<FileDescriptor> = state
            .blobs
            .iter()
            .filter(|b| container_ids.contains(&b.container_id))
            .cloned()
            .collect();
        blobs.sort_by_key(|b| b.upload_seq);
        Ok(blobs)
    }

    async fn find_blobs_by_name(
        &self,
        case_id: Uuid,
        name: &str,
        connection_token: Option<&str>,
    ) -> Result<Vec<FileDescriptor>, AppError> {
        let state = self.state.read().await;
        let container_ids = state.container_ids_for_case(case_id);
        let mut blobs: Vec<FileDescriptor> = state
            .blobs
            .iter()
            .filter(|b| container_ids.contains(&b.container_id) && b.name == name)
            .filter(|b| connection_token.is_none_or(|token| b.connection_token == token))
            .cloned()
            .collect();
        blobs.sort_by_key(|b| b.upload_seq);
        Ok(blobs)
    }

    async fn delete_blob(&self, blob_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let before = state.blobs.len();
        state.blobs.retain(|b| b.id != blob_id);
        Ok(state.blobs.len() < before)
    }
}
