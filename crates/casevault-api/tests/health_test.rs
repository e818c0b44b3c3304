//! Health probe, OpenAPI and request id integration tests.
//!
//! Run with: `cargo test -p casevault-api --test health_test`

mod helpers;

use helpers::storage::FlakyStorage;
use helpers::{setup_test_app, setup_test_app_with, test_config};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_probes_report_healthy() {
    let app = setup_test_app();
    let client = app.client();

    let response = client.get("/health/live").await;
    assert_eq!(response.status_code(), 200);

    let response = client.get("/health/ready").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");

    let response = client.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(body["storage_backend"], "memory");
}

#[tokio::test]
async fn test_storage_outage_degrades_health() {
    let storage = FlakyStorage::new();
    let app = setup_test_app_with(test_config(&[]), Arc::new(storage.clone()));
    storage.set_down(true);

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert!(body["storage"].as_str().unwrap().starts_with("degraded"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/v0/cases/{case}/files"].is_object());
    assert!(body["components"]["schemas"]["ErrorResponse"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .get("/health/live")
        .add_header("x-request-id", "req-123")
        .await;
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let response = client.get("/health/live").await;
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}
