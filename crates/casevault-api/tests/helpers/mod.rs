//! Test helpers: build AppState and router for integration tests.
//!
//! The default app runs entirely in process (memory repositories and memory
//! storage) so these tests need no external services. The Postgres variant in
//! `postgres_test.rs` needs Docker.

#![allow(dead_code)]

pub mod storage;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use casevault_api::constants;
use casevault_api::setup::routes;
use casevault_api::state::AppState;
use casevault_core::Config;
use casevault_db::Repositories;
use casevault_services::Services;
use casevault_storage::{MemoryStorage, Storage};
use std::collections::HashMap;
use std::sync::Arc;

pub const TOKEN_A: &str = "aaaa-1111-bbbb-2222";
pub const TOKEN_B: &str = "cccc-3333-dddd-4444";

/// API path prefix for tests (e.g. `/api/v0/cases`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on its backends.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Create a case through the API and assert it was created.
    pub async fn create_case(&self, name: &str) {
        let response = self
            .server
            .post(&api_path("/cases"))
            .json(&serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status_code(), 201, "{}", response.text());
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("DATABASE_URL", "memory://"),
        ("STORAGE_BACKEND", "memory"),
        ("MAX_FILE_SIZE_MB", "1"),
        ("MAX_FILES_PER_UPLOAD", "5"),
        ("UPLOAD_CONCURRENCY", "2"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(move |key| vars.get(key).cloned()).expect("test config")
}

/// App over memory repositories and memory storage.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config(&[]), Arc::new(MemoryStorage::new()))
}

/// App over memory repositories and the given storage backend.
pub fn setup_test_app_with(config: Config, storage: Arc<dyn Storage>) -> TestApp {
    build_app(config, Repositories::in_memory(), storage)
}

pub fn build_app(config: Config, repositories: Repositories, storage: Arc<dyn Storage>) -> TestApp {
    let services = Services::new(repositories, storage.clone(), &config);
    let state = Arc::new(AppState::new(config.clone(), services, storage));
    let router = routes::setup_routes(&config, state.clone()).expect("routes");
    let server = TestServer::new(router).expect("test server");
    TestApp { server, state }
}

/// Multipart body with one `file` part per (name, content) and an optional token field.
pub fn upload_form(files: &[(&str, &str)], token: Option<&str>) -> MultipartForm {
    let mut form = MultipartForm::new();
    if let Some(token) = token {
        form = form.add_text("connection_token", token.to_string());
    }
    for (name, content) in files {
        let part = Part::bytes(content.as_bytes().to_vec())
            .file_name(name.to_string())
            .mime_type("text/plain");
        form = form.add_part("file", part);
    }
    form
}
