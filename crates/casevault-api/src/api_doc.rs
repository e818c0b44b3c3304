//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use casevault_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CaseVault API",
        version = "0.1.0",
        description = "Case registry and per-case file storage (v0). Cases own upload containers keyed by a browser connection token; files are uploaded in batches with per-file outcomes. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Cases
        handlers::cases::create_case,
        handlers::cases::list_cases,
        handlers::cases::get_case,
        handlers::cases::archive_case,
        // Containers
        handlers::containers::provision_container,
        handlers::containers::list_containers,
        // Files
        handlers::files::upload_files,
        handlers::files::list_files,
        handlers::files::download_file,
        handlers::files::delete_file,
        // Admin
        handlers::admin::list_cases_with_summary,
    ),
    components(
        schemas(
            models::Case,
            models::CaseStatus,
            models::CaseListItem,
            models::CaseListResponse,
            models::CreateCaseRequest,
            models::Container,
            models::ProvisionContainerRequest,
            models::ContainerListResponse,
            models::FileDescriptor,
            models::FileListResponse,
            models::FileOutcome,
            models::UploadResult,
            models::CaseSummary,
            models::CaseSummaryResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "cases", description = "Case registration, lookup and archival"),
        (name = "containers", description = "Per-connection upload containers of a case"),
        (name = "files", description = "Batch upload, listing, download and deletion of case files"),
        (name = "admin", description = "Read-only summaries for the operator dashboard"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_canonical_path() {
        let spec = get_openapi_spec();
        for path in [
            "/api/v0/cases",
            "/api/v0/cases/{case}",
            "/api/v0/cases/{case}/archive",
            "/api/v0/cases/{case}/containers",
            "/api/v0/cases/{case}/files",
            "/api/v0/cases/{case}/files/{name}",
            "/api/v0/admin/cases",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_registers_error_schema() {
        let spec = get_openapi_spec();
        let components = spec.components.expect("components");
        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("UploadResult"));
    }
}
