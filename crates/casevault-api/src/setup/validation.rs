//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use casevault_core::{config::DatabaseBackend, Config, StorageBackend};

/// Hard failures come from `Config::validate`; this adds startup warnings on top.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if config.database_backend() == Some(DatabaseBackend::Memory) {
        tracing::warn!("DATABASE_URL=memory:// selected - intended for development only");
    }

    if config.storage_backend() == StorageBackend::Memory {
        tracing::warn!("STORAGE_BACKEND=memory selected - blobs are lost on restart");
    }

    if config.upload_concurrency() > config.db_max_connections() as usize * 4 {
        tracing::warn!(
            upload_concurrency = config.upload_concurrency(),
            db_max_connections = config.db_max_connections(),
            "UPLOAD_CONCURRENCY is much higher than the database pool size"
        );
    }

    if is_production && config.legacy_compat_enabled() {
        tracing::warn!("Deprecated legacy endpoints are enabled in production");
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
