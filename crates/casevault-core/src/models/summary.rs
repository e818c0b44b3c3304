use super::{CaseStatus, FileDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Admin view of one case
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseSummary {
    pub name: String,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub container_count: usize,
    pub file_count: usize,
    pub total_bytes: i64,
    pub files: Vec<FileDescriptor>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseSummaryResponse {
    pub cases: Vec<CaseSummary>,
}
