//! CaseVault Core Library
//!
//! This crate provides core domain models, error types, configuration, and validation
//! that are shared across all CaseVault components.

pub mod config;
pub mod connection_token;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, CaseVaultConfig, Config, DatabaseBackend, LogFormat};
pub use connection_token::ConnectionToken;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in the casevault-storage crate
