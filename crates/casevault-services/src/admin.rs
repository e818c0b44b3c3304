use crate::registry::CaseRegistry;
use casevault_core::models::{Case, CaseSummary, Container, FileDescriptor};
use casevault_core::AppError;
use casevault_db::{BlobRepository, ContainerRepository};
use std::sync::Arc;

/// Read-only aggregation for the admin view
#[derive(Clone)]
pub struct AdminQueryFacade {
    registry: CaseRegistry,
    containers: Arc<dyn ContainerRepository>,
    blobs: Arc<dyn BlobRepository>,
}

impl AdminQueryFacade {
    pub fn new(
        registry: CaseRegistry,
        containers: Arc<dyn ContainerRepository>,
        blobs: Arc<dyn BlobRepository>,
    ) -> Self {
        Self {
            registry,
            containers,
            blobs,
        }
    }

    /// Every case with its container and file aggregates.
    ///
    /// A case whose details fail to load is still returned, with empty lists.
    #[tracing::instrument(skip(self), fields(operation = "list_cases_with_summary"))]
    pub async fn list_cases_with_summary(&self) -> Result<Vec<CaseSummary>, AppError> {
        let cases = self.registry.list_cases().await?;
        let mut summaries = Vec::with_capacity(cases.len());

        for case in cases {
            let (containers, files) = match self.load_details(&case).await {
                Ok(details) => details,
                Err(e) => {
                    tracing::warn!(error = %e, case = %case.name, "Failed to load case details for summary");
                    (Vec::new(), Vec::new())
                }
            };
            summaries.push(summarize(case, &containers, files));
        }

        Ok(summaries)
    }

    async fn load_details(
        &self,
        case: &Case,
    ) -> Result<(Vec<Container>, Vec<FileDescriptor>), AppError> {
        let containers = self.containers.list_containers(case.id).await?;
        let files = self.blobs.list_blobs_for_case(case.id).await?;
        Ok((containers, files))
    }
}

fn summarize(case: Case, containers: &[Container], files: Vec<FileDescriptor>) -> CaseSummary {
    CaseSummary {
        name: case.name,
        status: case.status,
        created_at: case.created_at,
        container_count: containers.len(),
        file_count: files.len(),
        total_bytes: files.iter().map(|f| f.size_bytes).sum(),
        files,
    }
}
