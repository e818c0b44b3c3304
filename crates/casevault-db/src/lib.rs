//! CaseVault persistence layer
//!
//! Repository traits for cases, containers and blobs, with a PostgreSQL
//! implementation (sqlx) and an in-memory implementation selected by
//! `DATABASE_URL=memory://`.

pub mod db;

pub use db::{
    BlobRepository, CaseRepository, ContainerRepository, MemoryRepository,
    PostgresBlobRepository, PostgresCaseRepository, PostgresContainerRepository, Repositories,
};
