use crate::provisioner::{parse_or_generate_token, ContainerProvisioner};
use crate::registry::CaseRegistry;
use bytes::Bytes;
use casevault_core::constants::{DEFAULT_CONTENT_TYPE, MAX_BLOB_NAME_LENGTH};
use casevault_core::models::{Case, Container, FileOutcome, NewBlob, UploadResult};
use casevault_core::validation::sanitize_blob_name;
use casevault_core::{AppError, Config, ConnectionToken, ErrorMetadata};
use casevault_db::BlobRepository;
use casevault_storage::Storage;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// One uploaded file as received from the transport
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Batch limits applied before anything touches storage
#[derive(Debug, Clone, Copy)]
pub struct IngestionLimits {
    pub max_file_size_bytes: usize,
    pub max_files_per_upload: usize,
    pub upload_concurrency: usize,
}

impl IngestionLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes(),
            max_files_per_upload: config.max_files_per_upload(),
            upload_concurrency: config.upload_concurrency(),
        }
    }
}

impl Default for IngestionLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 25 * 1024 * 1024,
            max_files_per_upload: 50,
            upload_concurrency: 4,
        }
    }
}

struct PreparedFile {
    name: String,
    content_type: String,
    data: Bytes,
}

#[derive(Clone)]
pub struct FileIngestionService {
    registry: CaseRegistry,
    provisioner: ContainerProvisioner,
    blobs: Arc<dyn BlobRepository>,
    storage: Arc<dyn Storage>,
    limits: IngestionLimits,
}

impl FileIngestionService {
    pub fn new(
        registry: CaseRegistry,
        provisioner: ContainerProvisioner,
        blobs: Arc<dyn BlobRepository>,
        storage: Arc<dyn Storage>,
        limits: IngestionLimits,
    ) -> Self {
        Self {
            registry,
            provisioner,
            blobs,
            storage,
            limits,
        }
    }

    /// Upload a batch of files into the container of (case, token).
    ///
    /// The batch is validated as a whole first; any invalid file rejects the
    /// batch and nothing is stored. Blobs are then written concurrently and
    /// indexed in input order, and every file gets its own outcome.
    #[tracing::instrument(skip(self, files), fields(operation = "upload", file_count = files.len()))]
    pub async fn upload(
        &self,
        case_name: &str,
        connection_token: Option<&str>,
        files: Vec<IncomingFile>,
    ) -> Result<UploadResult, AppError> {
        let case = self.registry.get_active_case(case_name).await?;
        let token = parse_or_generate_token(connection_token)?;
        let prepared = self.validate_batch(files)?;

        let container = self.provisioner.provision_for_case(&case, &token).await?;

        let storage = self.storage.clone();
        let container_name = container.name.clone();
        let writes: Vec<_> = stream::iter(prepared)
            .map(|file| {
                let storage = storage.clone();
                let container_name = container_name.clone();
                async move {
                    let start = std::time::Instant::now();
                    let result = storage
                        .put_blob(
                            &container_name,
                            &versioned_blob_name(&file.name),
                            &file.content_type,
                            file.data.clone(),
                        )
                        .await;
                    tracing::debug!(
                        file = %file.name,
                        size_bytes = file.data.len(),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        ok = result.is_ok(),
                        "Blob write finished"
                    );
                    (file, result)
                }
            })
            .buffered(self.limits.upload_concurrency.max(1))
            .collect()
            .await;

        // Index sequentially so upload order follows input order.
        let mut outcomes = Vec::with_capacity(writes.len());
        for (file, write) in writes {
            let outcome = match write {
                Ok(storage_key) => {
                    self.index_blob(&case, &container, &token, file, storage_key)
                        .await
                }
                Err(e) => {
                    let err = AppError::from(e);
                    tracing::warn!(error = %err, file = %file.name, "Blob write failed");
                    failed_outcome(file.name, &err)
                }
            };
            outcomes.push(outcome);
        }

        let result = UploadResult {
            case: case.name,
            container: container.name,
            connection_token: token.to_string(),
            files: outcomes,
        };

        tracing::info!(
            case = %result.case,
            container = %result.container,
            stored = result.stored_count(),
            failed = result.failed_count(),
            "Upload batch processed"
        );

        Ok(result)
    }

    /// Index one written blob version.
    ///
    /// The previous version of the same name keeps its own storage key until
    /// the new row is in place, so a failed index write leaves it listed and
    /// readable. Only then is the superseded blob removed.
    async fn index_blob(
        &self,
        case: &Case,
        container: &Container,
        token: &ConnectionToken,
        file: PreparedFile,
        storage_key: String,
    ) -> FileOutcome {
        let previous_key = match self
            .blobs
            .find_blobs_by_name(case.id, &file.name, Some(token.as_str()))
            .await
        {
            Ok(found) => found
                .into_iter()
                .find(|b| b.container_id == container.id)
                .map(|b| b.storage_key),
            Err(e) => {
                tracing::warn!(error = %e, file = %file.name, "Failed to look up previous version");
                None
            }
        };

        let new_blob = NewBlob {
            container_id: container.id,
            name: file.name.clone(),
            size_bytes: file.data.len() as i64,
            content_type: file.content_type.clone(),
            storage_key: storage_key.clone(),
        };

        match self.blobs.upsert_blob(new_blob).await {
            Ok(descriptor) => {
                if let Some(old_key) = previous_key.filter(|k| *k != storage_key) {
                    if let Err(e) = self.storage.delete_blob(&old_key).await {
                        tracing::warn!(error = %e, key = %old_key, "Failed to remove superseded blob");
                    }
                }
                FileOutcome::Stored {
                    name: descriptor.name,
                    size_bytes: descriptor.size_bytes,
                    uploaded_at: descriptor.uploaded_at,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, file = %file.name, "Failed to index stored blob");
                if let Err(cleanup) = self.storage.delete_blob(&storage_key).await {
                    tracing::warn!(error = %cleanup, key = %storage_key, "Failed to remove unindexed blob");
                }
                failed_outcome(file.name, &e)
            }
        }
    }

    fn validate_batch(&self, files: Vec<IncomingFile>) -> Result<Vec<PreparedFile>, AppError> {
        if files.is_empty() {
            return Err(AppError::Validation("No files provided".to_string()));
        }
        if files.len() > self.limits.max_files_per_upload {
            return Err(AppError::Validation(format!(
                "Batch of {} files exceeds the maximum of {}",
                files.len(),
                self.limits.max_files_per_upload
            )));
        }

        let mut seen = HashSet::with_capacity(files.len());
        let mut prepared = Vec::with_capacity(files.len());
        for file in files {
            let name = sanitize_blob_name(&file.filename)?;

            if file.data.is_empty() {
                return Err(AppError::Validation(format!("File '{}' is empty", name)));
            }
            if file.data.len() > self.limits.max_file_size_bytes {
                return Err(AppError::Validation(format!(
                    "File '{}' is {} bytes, exceeding the maximum of {} bytes",
                    name,
                    file.data.len(),
                    self.limits.max_file_size_bytes
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(AppError::Validation(format!(
                    "File name '{}' appears more than once in the batch",
                    name
                )));
            }

            let content_type = file
                .content_type
                .map(|ct| ct.trim().to_string())
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

            prepared.push(PreparedFile {
                name,
                content_type,
                data: file.data,
            });
        }
        Ok(prepared)
    }
}

/// Storage object name of one uploaded version: `{name}~{version}`.
///
/// The name part is shortened so the whole object name stays within
/// `MAX_BLOB_NAME_LENGTH`.
fn versioned_blob_name(name: &str) -> String {
    let version = Uuid::new_v4().simple().to_string();
    let keep = MAX_BLOB_NAME_LENGTH.saturating_sub(version.len() + 1);
    let stem: String = name.chars().take(keep).collect();
    format!("{}~{}", stem, version)
}

fn failed_outcome(name: String, err: &AppError) -> FileOutcome {
    FileOutcome::Failed {
        name,
        code: err.error_code().to_string(),
        error: err.client_message(),
        recoverable: err.is_recoverable(),
    }
}
