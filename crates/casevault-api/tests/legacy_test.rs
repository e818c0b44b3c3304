//! Deprecated endpoint integration tests.
//!
//! Run with: `cargo test -p casevault-api --test legacy_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use axum_test::multipart::Part;
use casevault_storage::MemoryStorage;
use helpers::{api_path, setup_test_app, setup_test_app_with, test_config, upload_form, TOKEN_A};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_form_case_creation() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post("/admin")
        .form(&[("case_name", "alpha")])
        .await;
    assert_eq!(response.status_code(), 201);
    assert_eq!(response.headers()["deprecation"], "true");
    assert!(response.text().contains("alpha"));

    let response = client.get(&api_path("/cases/alpha")).await;
    assert_eq!(response.status_code(), 200);

    // Missing or blank name
    let response = client
        .post("/admin/")
        .form(&[("case_name", "   ")])
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_NAME");

    let response = client.post("/admin").form(&[("other", "x")]).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_bare_file_listing() {
    let app = setup_test_app();
    app.create_case("alpha").await;
    app.client()
        .post(&api_path("/cases/alpha/files"))
        .multipart(upload_form(&[("a.txt", "abc"), ("b.txt", "d")], Some(TOKEN_A)))
        .await;

    let response = app.client().get("/case/alpha/files").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()["deprecation"], "true");
    let body: Value = response.json();
    assert_eq!(
        body,
        serde_json::json!([
            { "name": "a.txt", "size": 3 },
            { "name": "b.txt", "size": 1 }
        ])
    );
}

#[tokio::test]
async fn test_post_delete_intent() {
    let app = setup_test_app();
    app.create_case("alpha").await;
    let client = app.client();
    client
        .post(&api_path("/cases/alpha/files"))
        .multipart(upload_form(&[("a.txt", "abc")], Some(TOKEN_A)))
        .await;

    let response = client
        .post(&api_path("/cases/alpha/files/delete"))
        .json(&serde_json::json!({ "name": "a.txt" }))
        .await;
    assert_eq!(response.status_code(), 204);
    assert_eq!(response.headers()["deprecation"], "true");

    let response = client
        .post(&api_path("/cases/alpha/files/delete"))
        .json(&serde_json::json!({ "name": "a.txt", "connection_token": TOKEN_A }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_post_delete_intent_requires_name() {
    let app = setup_test_app();
    app.create_case("alpha").await;

    let response = app
        .client()
        .post(&api_path("/cases/alpha/files/delete"))
        .json(&serde_json::json!({ "name": "" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_file_named_delete_stays_reachable() {
    let app = setup_test_app();
    app.create_case("alpha").await;
    let client = app.client();
    let response = client
        .post(&api_path("/cases/alpha/files"))
        .multipart(upload_form(&[("delete", "payload")], Some(TOKEN_A)))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = client.get(&api_path("/cases/alpha/files/delete")).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(&response.as_bytes()[..], b"payload");
    assert!(response.headers().get("deprecation").is_none());

    let response = client
        .delete(&api_path("/cases/alpha/files/delete"))
        .add_query_param("connection_token", TOKEN_A)
        .await;
    assert_eq!(response.status_code(), 204);

    let response = client.get(&api_path("/cases/alpha/files/delete")).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_connection_id_alias_on_upload() {
    let app = setup_test_app();
    app.create_case("alpha").await;

    let form = MultipartForm::new()
        .add_text("connectionId", TOKEN_A)
        .add_part("file", Part::bytes(b"abc".to_vec()).file_name("a.txt"));
    let response = app
        .client()
        .post(&api_path("/cases/alpha/files"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201);
    let result: Value = response.json();
    assert_eq!(result["connection_token"], TOKEN_A);
}

#[tokio::test]
async fn test_canonical_endpoints_are_not_deprecated() {
    let app = setup_test_app();
    let response = app.client().get(&api_path("/cases")).await;
    assert_eq!(response.status_code(), 200);
    assert!(response.headers().get("deprecation").is_none());
}

#[tokio::test]
async fn test_legacy_surface_can_be_disabled() {
    let app = setup_test_app_with(
        test_config(&[("LEGACY_COMPAT_ENABLED", "false")]),
        Arc::new(MemoryStorage::new()),
    );
    app.create_case("alpha").await;
    let client = app.client();

    let response = client.post("/admin").form(&[("case_name", "beta")]).await;
    assert_eq!(response.status_code(), 404);

    let response = client.get("/case/alpha/files").await;
    assert_eq!(response.status_code(), 404);

    // The alias is ignored, so a fresh token is generated
    let form = MultipartForm::new()
        .add_text("connectionId", TOKEN_A)
        .add_part("file", Part::bytes(b"abc".to_vec()).file_name("a.txt"));
    let response = client
        .post(&api_path("/cases/alpha/files"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201);
    let result: Value = response.json();
    assert_ne!(result["connection_token"], TOKEN_A);
}
