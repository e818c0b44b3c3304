//! CaseVault Storage Library
//!
//! This crate provides the blob storage abstraction and its implementations:
//! a local filesystem backend and an in-process memory backend.
//!
//! # Storage key format
//!
//! Every blob lives in a container named after its (case, connection token)
//! pair, and its key is `{container}/{blob_name}`. Keys must not contain `..`
//! or a leading `/`, and the blob name must be a single path segment. Key
//! generation is centralized in the `keys` module so all backends stay
//! consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use casevault_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageError, StorageResult};
