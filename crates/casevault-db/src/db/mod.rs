//! Database repositories for data access layer
//!
//! Each repository owns one entity: cases, containers or blobs. The traits
//! abstract the backend so services work against PostgreSQL in production
//! and against the in-memory store in development and tests.

pub mod blobs;
pub mod cases;
pub mod containers;
pub mod memory;

pub use blobs::{BlobRepository, PostgresBlobRepository};
pub use cases::{CaseRepository, PostgresCaseRepository};
pub use containers::{ContainerRepository, PostgresContainerRepository};
pub use memory::MemoryRepository;

use sqlx::PgPool;
use std::sync::Arc;

/// Bundle of repository handles shared by the services
#[derive(Clone)]
pub struct Repositories {
    pub cases: Arc<dyn CaseRepository>,
    pub containers: Arc<dyn ContainerRepository>,
    pub blobs: Arc<dyn BlobRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            cases: Arc::new(PostgresCaseRepository::new(pool.clone())),
            containers: Arc::new(PostgresContainerRepository::new(pool.clone())),
            blobs: Arc::new(PostgresBlobRepository::new(pool)),
        }
    }

    /// Process-local repositories sharing one store
    pub fn in_memory() -> Self {
        let store = MemoryRepository::new();
        Self {
            cases: Arc::new(store.clone()),
            containers: Arc::new(store.clone()),
            blobs: Arc::new(store),
        }
    }
}
