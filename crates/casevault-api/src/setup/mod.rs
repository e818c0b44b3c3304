//! Application setup and initialization
//!
//! All startup wiring lives here so the binary stays a thin shell and the
//! integration tests can build the same router over in-memory backends.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use casevault_core::Config;
use casevault_services::Services;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format(), config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let repositories = database::setup_repositories(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let services = Services::new(repositories, storage.clone(), &config);
    let state = Arc::new(AppState::new(config.clone(), services, storage));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
