use crate::registry::CaseRegistry;
use casevault_core::models::FileDescriptor;
use casevault_core::{AppError, ConnectionToken};
use casevault_db::BlobRepository;
use casevault_storage::Storage;
use std::sync::Arc;

/// Lists, downloads and deletes files within a case
#[derive(Clone)]
pub struct FileManager {
    registry: CaseRegistry,
    blobs: Arc<dyn BlobRepository>,
    storage: Arc<dyn Storage>,
}

impl FileManager {
    pub fn new(
        registry: CaseRegistry,
        blobs: Arc<dyn BlobRepository>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            registry,
            blobs,
            storage,
        }
    }

    /// Every file of the case across its containers, in upload order
    #[tracing::instrument(skip(self), fields(operation = "list_files"))]
    pub async fn list_files(&self, case_name: &str) -> Result<Vec<FileDescriptor>, AppError> {
        let case = self.registry.get_case(case_name).await?;
        self.blobs.list_blobs_for_case(case.id).await
    }

    /// Delete a file. The index entry goes first so a blob-removal failure
    /// never leaves a listed file without content.
    #[tracing::instrument(skip(self), fields(operation = "delete_file"))]
    pub async fn delete_file(
        &self,
        case_name: &str,
        file_name: &str,
        connection_token: Option<&str>,
    ) -> Result<(), AppError> {
        let file = self
            .resolve_file(case_name, file_name, connection_token)
            .await?;

        if !self.blobs.delete_blob(file.id).await? {
            // A concurrent delete won.
            return Err(not_found(case_name, file_name));
        }

        if let Err(e) = self.storage.delete_blob(&file.storage_key).await {
            tracing::warn!(
                error = %e,
                key = %file.storage_key,
                "Blob removal failed after index delete; content is orphaned"
            );
        }

        tracing::info!(
            file = %file.name,
            container = %file.container_name,
            size_bytes = file.size_bytes,
            "File deleted"
        );
        Ok(())
    }

    /// Fetch a file's descriptor and content
    #[tracing::instrument(skip(self), fields(operation = "download_file"))]
    pub async fn download_file(
        &self,
        case_name: &str,
        file_name: &str,
        connection_token: Option<&str>,
    ) -> Result<(FileDescriptor, Vec<u8>), AppError> {
        let file = self
            .resolve_file(case_name, file_name, connection_token)
            .await?;
        let data = self.storage.get_blob(&file.storage_key).await?;
        Ok((file, data))
    }

    /// Find the single file a (case, name, token?) request refers to.
    ///
    /// Without a token, a name present in several containers is `Ambiguous`.
    async fn resolve_file(
        &self,
        case_name: &str,
        file_name: &str,
        connection_token: Option<&str>,
    ) -> Result<FileDescriptor, AppError> {
        let case = self.registry.get_case(case_name).await?;
        let token = connection_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ConnectionToken::parse)
            .transpose()?;

        let mut matches = self
            .blobs
            .find_blobs_by_name(case.id, file_name, token.as_ref().map(|t| t.as_str()))
            .await?;

        match matches.len() {
            0 => Err(not_found(&case.name, file_name)),
            1 => Ok(matches.remove(0)),
            _ => {
                let containers: Vec<&str> =
                    matches.iter().map(|m| m.container_name.as_str()).collect();
                Err(AppError::Ambiguous(format!(
                    "File '{}' exists in {} containers of case '{}' ({}); specify a connection_token",
                    file_name,
                    matches.len(),
                    case.name,
                    containers.join(", ")
                )))
            }
        }
    }
}

fn not_found(case_name: &str, file_name: &str) -> AppError {
    AppError::NotFound(format!(
        "File '{}' not found in case '{}'",
        file_name, case_name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContainerProvisioner, FileIngestionService, IncomingFile, IngestionLimits};
    use bytes::Bytes;
    use casevault_core::validation::CaseNamePolicy;
    use casevault_db::Repositories;
    use casevault_storage::MemoryStorage;

    const TOKEN_A: &str = "aaaa-aaaa-aaaa-aaaa";
    const TOKEN_B: &str = "bbbb-bbbb-bbbb-bbbb";

    async fn setup() -> (FileManager, FileIngestionService, MemoryStorage) {
        let repos = Repositories::in_memory();
        let memory = MemoryStorage::new();
        let storage: Arc<dyn Storage> = Arc::new(memory.clone());
        let registry = CaseRegistry::new(repos.cases.clone(), CaseNamePolicy::default());
        registry.create_case("alpha").await.unwrap();
        let provisioner =
            ContainerProvisioner::new(registry.clone(), repos.containers.clone(), storage.clone());
        let ingestion = FileIngestionService::new(
            registry.clone(),
            provisioner,
            repos.blobs.clone(),
            storage.clone(),
            IngestionLimits::default(),
        );
        let manager = FileManager::new(registry, repos.blobs, storage);
        (manager, ingestion, memory)
    }

    fn file(name: &str, body: &'static [u8]) -> IncomingFile {
        IncomingFile {
            filename: name.to_string(),
            content_type: None,
            data: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn deleting_unknown_file_is_not_found_and_changes_nothing() {
        let (manager, ingestion, _) = setup().await;
        ingestion
            .upload("alpha", Some(TOKEN_A), vec![file("keep.txt", b"k")])
            .await
            .unwrap();

        let err = manager
            .delete_file("alpha", "never.txt", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let names: Vec<String> = manager
            .list_files("alpha")
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["keep.txt"]);
    }

    #[tokio::test]
    async fn delete_removes_file_and_second_delete_is_not_found() {
        let (manager, ingestion, memory) = setup().await;
        ingestion
            .upload(
                "alpha",
                Some(TOKEN_A),
                vec![file("a.txt", b"a"), file("b.txt", b"b")],
            )
            .await
            .unwrap();

        manager.delete_file("alpha", "a.txt", None).await.unwrap();

        let listed = manager.list_files("alpha").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "b.txt");
        assert_eq!(memory.blob_count().await, 1);

        let err = manager.delete_file("alpha", "a.txt", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn name_in_two_containers_needs_a_token() {
        let (manager, ingestion, _) = setup().await;
        ingestion
            .upload("alpha", Some(TOKEN_A), vec![file("dup.txt", b"first")])
            .await
            .unwrap();
        ingestion
            .upload("alpha", Some(TOKEN_B), vec![file("dup.txt", b"second")])
            .await
            .unwrap();

        let err = manager.delete_file("alpha", "dup.txt", None).await.unwrap_err();
        assert!(matches!(err, AppError::Ambiguous(_)));

        let (descriptor, data) = manager
            .download_file("alpha", "dup.txt", Some(TOKEN_B))
            .await
            .unwrap();
        assert_eq!(descriptor.connection_token, TOKEN_B);
        assert_eq!(data, b"second");

        manager
            .delete_file("alpha", "dup.txt", Some(TOKEN_A))
            .await
            .unwrap();
        let remaining = manager.list_files("alpha").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].connection_token, TOKEN_B);

        manager.delete_file("alpha", "dup.txt", None).await.unwrap();
        assert!(manager.list_files("alpha").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_case_and_bad_token() {
        let (manager, _, _) = setup().await;
        assert!(matches!(
            manager.list_files("ghost").await.unwrap_err(),
            AppError::UnknownCase(_)
        ));
        assert!(matches!(
            manager
                .download_file("alpha", "a.txt", Some("bad"))
                .await
                .unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn archived_case_files_stay_readable_and_deletable() {
        let (manager, ingestion, _) = setup().await;
        ingestion
            .upload("alpha", Some(TOKEN_A), vec![file("a.txt", b"a")])
            .await
            .unwrap();
        manager.registry.archive_case("alpha").await.unwrap();

        let (_, data) = manager.download_file("alpha", "a.txt", None).await.unwrap();
        assert_eq!(data, b"a");
        manager.delete_file("alpha", "a.txt", None).await.unwrap();
    }
}
