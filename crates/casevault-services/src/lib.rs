//! CaseVault Services Layer
//!
//! Business services over the repositories and blob storage: the case
//! registry, container provisioning, file ingestion, file management and the
//! read-only admin queries. HTTP handling stays in casevault-api.

pub mod admin;
pub mod ingestion;
pub mod manager;
pub mod provisioner;
pub mod registry;

pub use admin::AdminQueryFacade;
pub use ingestion::{FileIngestionService, IncomingFile, IngestionLimits};
pub use manager::FileManager;
pub use provisioner::ContainerProvisioner;
pub use registry::CaseRegistry;

pub use casevault_storage::{create_storage, Storage, StorageBackend, StorageError};

use casevault_core::validation::CaseNamePolicy;
use casevault_core::Config;
use casevault_db::Repositories;
use std::sync::Arc;

/// All services wired over one set of repositories and one storage backend
#[derive(Clone)]
pub struct Services {
    pub registry: CaseRegistry,
    pub provisioner: ContainerProvisioner,
    pub ingestion: FileIngestionService,
    pub files: FileManager,
    pub admin: AdminQueryFacade,
}

impl Services {
    pub fn new(repositories: Repositories, storage: Arc<dyn Storage>, config: &Config) -> Self {
        let registry = CaseRegistry::new(
            repositories.cases.clone(),
            CaseNamePolicy::new(config.case_name_max_length()),
        );
        let provisioner = ContainerProvisioner::new(
            registry.clone(),
            repositories.containers.clone(),
            storage.clone(),
        );
        let ingestion = FileIngestionService::new(
            registry.clone(),
            provisioner.clone(),
            repositories.blobs.clone(),
            storage.clone(),
            IngestionLimits::from_config(config),
        );
        let files = FileManager::new(registry.clone(), repositories.blobs.clone(), storage);
        let admin = AdminQueryFacade::new(
            registry.clone(),
            repositories.containers,
            repositories.blobs,
        );

        Self {
            registry,
            provisioner,
            ingestion,
            files,
            admin,
        }
    }
}
