use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Indexed file stored in a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileDescriptor {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub container_id: Uuid,
    pub container_name: String,
    pub connection_token: String,
    #[serde(skip)]
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
    /// Position in upload order; higher means uploaded later
    pub upload_seq: i64,
}

/// Input for indexing a blob that has already been written to storage
#[derive(Debug, Clone)]
pub struct NewBlob {
    pub container_id: Uuid,
    pub name: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub storage_key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileDescriptor>,
}

/// Per-file result of an upload batch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Stored {
        name: String,
        size_bytes: i64,
        uploaded_at: DateTime<Utc>,
    },
    Failed {
        name: String,
        code: String,
        error: String,
        recoverable: bool,
    },
}

impl FileOutcome {
    pub fn name(&self) -> &str {
        match self {
            FileOutcome::Stored { name, .. } | FileOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, FileOutcome::Stored { .. })
    }
}

/// Result of an upload batch; `files` follows the input order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub case: String,
    pub container: String,
    pub connection_token: String,
    pub files: Vec<FileOutcome>,
}

impl UploadResult {
    pub fn stored_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_stored()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.stored_count()
    }
}

/// Request DTO for the delete-intent compatibility endpoint
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DeleteFileRequest {
    #[validate(length(min = 1, message = "File name is required"))]
    pub name: String,
    #[serde(default)]
    pub connection_token: Option<String>,
}
