//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
    pub storage_backend: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the case registry can reach its repository.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    let database = run_check(TIMEOUT, state.services.registry.ping(), "not_ready").await;
    let ready = database == "healthy";
    if !ready {
        tracing::error!(database = %database, "Readiness check failed");
    }

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status = if ready { "ready" } else { "not_ready" };

    (
        status_code,
        Json(serde_json::json!({ "status": status, "database": database })),
    )
}

/// Full health check. Storage trouble degrades but does not fail the probe.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let database = run_check(TIMEOUT, state.services.registry.ping(), "unhealthy").await;
    let storage = run_check(TIMEOUT, state.storage.health_check(), "degraded").await;

    let overall_healthy = database == "healthy";
    let status = if !overall_healthy {
        "unhealthy"
    } else if storage != "healthy" {
        "degraded"
    } else {
        "healthy"
    };

    let response = HealthCheckResponse {
        status: status.to_string(),
        database,
        storage,
        storage_backend: state.storage.backend_type().to_string(),
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
