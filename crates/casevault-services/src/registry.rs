use casevault_core::models::Case;
use casevault_core::validation::{normalize_case_name, CaseNamePolicy};
use casevault_core::AppError;
use casevault_db::CaseRepository;
use std::sync::Arc;

/// Owns the namespace of case names
#[derive(Clone)]
pub struct CaseRegistry {
    cases: Arc<dyn CaseRepository>,
    policy: CaseNamePolicy,
}

impl CaseRegistry {
    pub fn new(cases: Arc<dyn CaseRepository>, policy: CaseNamePolicy) -> Self {
        Self { cases, policy }
    }

    /// Create a case. The name is trimmed before validation and the
    /// uniqueness check; creation has no provisioning side effects.
    #[tracing::instrument(skip(self), fields(operation = "create_case"))]
    pub async fn create_case(&self, raw_name: &str) -> Result<Case, AppError> {
        let name = self.policy.validate(raw_name)?;
        let case = self.cases.insert_case(&name).await?;
        tracing::info!(case_id = %case.id, case = %case.name, "Case created");
        Ok(case)
    }

    /// All cases in creation order
    #[tracing::instrument(skip(self), fields(operation = "list_cases"))]
    pub async fn list_cases(&self) -> Result<Vec<Case>, AppError> {
        self.cases.list_cases().await
    }

    #[tracing::instrument(skip(self), fields(operation = "get_case"))]
    pub async fn get_case(&self, name: &str) -> Result<Case, AppError> {
        let name = normalize_case_name(name);
        self.cases
            .find_case(name)
            .await?
            .ok_or_else(|| AppError::UnknownCase(name.to_string()))
    }

    /// Resolve a case that must still accept writes
    pub async fn get_active_case(&self, name: &str) -> Result<Case, AppError> {
        let case = self.get_case(name).await?;
        if case.is_archived() {
            return Err(AppError::CaseArchived(case.name));
        }
        Ok(case)
    }

    /// Archive a case. Archiving twice returns the archived case unchanged.
    #[tracing::instrument(skip(self), fields(operation = "archive_case"))]
    pub async fn archive_case(&self, name: &str) -> Result<Case, AppError> {
        let name = normalize_case_name(name);
        let case = self
            .cases
            .archive_case(name)
            .await?
            .ok_or_else(|| AppError::UnknownCase(name.to_string()))?;
        tracing::info!(case_id = %case.id, case = %case.name, "Case archived");
        Ok(case)
    }

    /// Readiness probe for the backing repository
    pub async fn ping(&self) -> Result<(), AppError> {
        self.cases.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casevault_core::models::CaseStatus;
    use casevault_db::MemoryRepository;

    fn registry() -> CaseRegistry {
        CaseRegistry::new(Arc::new(MemoryRepository::new()), CaseNamePolicy::default())
    }

    #[tokio::test]
    async fn create_twice_yields_duplicate_name() {
        let registry = registry();
        let case = registry.create_case("Smith v. Jones").await.unwrap();
        assert_eq!(case.status, CaseStatus::Active);

        let err = registry.create_case("  Smith v. Jones ").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateName(name) if name == "Smith v. Jones"));
    }

    #[tokio::test]
    async fn concurrent_creation_has_one_winner() {
        let registry = registry();
        let attempts = (0..10).map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.create_case("contested").await })
        });
        let results: Vec<_> = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AppError::DuplicateName(_))));
        assert_eq!(registry.list_cases().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_names_are_rejected_before_persisting() {
        let registry = registry();
        for raw in ["", "   ", "bad/name", &"x".repeat(129)] {
            let err = registry.create_case(raw).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidName(_)), "accepted {raw:?}");
        }
        assert!(registry.list_cases().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_and_archive() {
        let registry = registry();
        registry.create_case("alpha").await.unwrap();

        assert!(matches!(
            registry.get_case("beta").await.unwrap_err(),
            AppError::UnknownCase(_)
        ));
        assert!(matches!(
            registry.archive_case("beta").await.unwrap_err(),
            AppError::UnknownCase(_)
        ));

        let archived = registry.archive_case("alpha").await.unwrap();
        assert!(archived.is_archived());
        let again = registry.archive_case("alpha").await.unwrap();
        assert_eq!(archived, again);

        assert!(matches!(
            registry.get_active_case("alpha").await.unwrap_err(),
            AppError::CaseArchived(_)
        ));
        assert!(registry.get_case("alpha").await.unwrap().is_archived());
    }
}
