use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Storage container bound to one (case, connection token) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Container {
    pub id: Uuid,
    pub case_id: Uuid,
    pub connection_token: String,
    /// Derived, deterministic storage container name
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for explicit provisioning
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProvisionContainerRequest {
    /// Omit to have the server generate a token
    #[serde(default)]
    pub connection_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContainerListResponse {
    pub containers: Vec<Container>,
}
