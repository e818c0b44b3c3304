//! Application state shared by all handlers.

use casevault_core::Config;
use casevault_services::Services;
use casevault_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub services: Services,
    /// Kept alongside the services for health probes
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, services: Services, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            services,
            storage,
        }
    }
}
