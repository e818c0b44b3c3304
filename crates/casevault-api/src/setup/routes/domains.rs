//! Domain route groups (cases, containers, files, admin).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn case_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/cases", API_PREFIX),
            post(handlers::cases::create_case).get(handlers::cases::list_cases),
        )
        .route(
            &format!("{}/cases/{{case}}", API_PREFIX),
            get(handlers::cases::get_case),
        )
        .route(
            &format!("{}/cases/{{case}}/archive", API_PREFIX),
            post(handlers::cases::archive_case),
        )
        .with_state(state)
}

pub fn container_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/cases/{{case}}/containers", API_PREFIX),
            post(handlers::containers::provision_container)
                .get(handlers::containers::list_containers),
        )
        .with_state(state)
}

pub fn file_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/cases/{{case}}/files", API_PREFIX),
            post(handlers::files::upload_files).get(handlers::files::list_files),
        )
        .route(
            &format!("{}/cases/{{case}}/files/{{name}}", API_PREFIX),
            get(handlers::files::download_file).delete(handlers::files::delete_file),
        )
        .with_state(state)
}

pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/admin/cases", API_PREFIX),
            get(handlers::admin::list_cases_with_summary),
        )
        .with_state(state)
}
