use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a case. Cases are never deleted, only archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Active,
    Archived,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Active => "active",
            CaseStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CaseStatus::Active),
            "archived" => Ok(CaseStatus::Archived),
            other => Err(anyhow::anyhow!("Invalid case status: {}", other)),
        }
    }
}

/// A named workspace grouping containers and their files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Case {
    pub id: Uuid,
    pub name: String,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
}

impl Case {
    pub fn is_archived(&self) -> bool {
        self.status == CaseStatus::Archived
    }
}

/// Request DTO for creating a case
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCaseRequest {
    /// Checked against the configured case name policy, length included
    pub name: String,
}

/// Entry of the case listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseListItem {
    pub name: String,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Case> for CaseListItem {
    fn from(case: Case) -> Self {
        Self {
            name: case.name,
            status: case.status,
            created_at: case.created_at,
        }
    }
}

/// Stable listing shape: `{ "cases": [ { "name": ... }, ... ] }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseListResponse {
    pub cases: Vec<CaseListItem>,
}
