use crate::registry::CaseRegistry;
use casevault_core::connection_token::derive_container_name;
use casevault_core::models::{Case, Container};
use casevault_core::{AppError, ConnectionToken};
use casevault_db::ContainerRepository;
use casevault_storage::Storage;
use std::sync::Arc;

/// Maps (case, connection token) pairs onto storage containers
#[derive(Clone)]
pub struct ContainerProvisioner {
    registry: CaseRegistry,
    containers: Arc<dyn ContainerRepository>,
    storage: Arc<dyn Storage>,
}

impl ContainerProvisioner {
    pub fn new(
        registry: CaseRegistry,
        containers: Arc<dyn ContainerRepository>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            registry,
            containers,
            storage,
        }
    }

    /// Provision the container for a case and token, generating a token when
    /// none is given. Idempotent per (case, token).
    #[tracing::instrument(skip(self), fields(operation = "provision"))]
    pub async fn provision(
        &self,
        case_name: &str,
        connection_token: Option<&str>,
    ) -> Result<Container, AppError> {
        let token = parse_or_generate_token(connection_token)?;
        let case = self.registry.get_active_case(case_name).await?;
        self.provision_for_case(&case, &token).await
    }

    /// Provision against an already resolved, active case
    pub(crate) async fn provision_for_case(
        &self,
        case: &Case,
        token: &ConnectionToken,
    ) -> Result<Container, AppError> {
        let name = derive_container_name(&case.name, token);

        // Backing container first so a claimed row always has storage behind it.
        self.storage.create_container(&name).await?;
        let container = self
            .containers
            .claim_container(case.id, token.as_str(), &name)
            .await?;

        tracing::debug!(
            case = %case.name,
            container = %container.name,
            container_id = %container.id,
            "Container provisioned"
        );
        Ok(container)
    }

    /// Containers of a case in creation order
    #[tracing::instrument(skip(self), fields(operation = "list_containers"))]
    pub async fn list_containers(&self, case_name: &str) -> Result<Vec<Container>, AppError> {
        let case = self.registry.get_case(case_name).await?;
        self.containers.list_containers(case.id).await
    }
}

/// Parse a caller-supplied token or mint a fresh one. Blank counts as absent.
pub(crate) fn parse_or_generate_token(raw: Option<&str>) -> Result<ConnectionToken, AppError> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => ConnectionToken::parse(raw),
        None => Ok(ConnectionToken::generate()),
    }
}
