use casevault_core::models::{FileDescriptor, NewBlob};
use casevault_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Blob index persistence. Blob names are unique per container.
#[async_trait::async_trait]
pub trait BlobRepository: Send + Sync {
    /// Index a stored blob. An existing entry with the same (container, name)
    /// is replaced and moves to the end of upload order.
    async fn upsert_blob(&self, blob: NewBlob) -> Result<FileDescriptor, AppError>;

    /// Every blob of a case across its containers, by upload order
    async fn list_blobs_for_case(&self, case_id: Uuid) -> Result<Vec<FileDescriptor>, AppError>;

    /// Blobs of a case with the given name, optionally restricted to the
    /// container of one connection token
    async fn find_blobs_by_name(
        &self,
        case_id: Uuid,
        name: &str,
        connection_token: Option<&str>,
    ) -> Result<Vec<FileDescriptor>, AppError>;

    /// Remove an index entry. Returns false if it was already gone.
    async fn delete_blob(&self, blob_id: Uuid) -> Result<bool, AppError>;
}

#[derive(sqlx::FromRow)]
struct BlobRow {
    id: Uuid,
    name: String,
    size_bytes: i64,
    content_type: String,
    container_id: Uuid,
    container_name: String,
    connection_token: String,
    storage_key: String,
    uploaded_at: DateTime<Utc>,
    upload_seq: i64,
}

impl From<BlobRow> for FileDescriptor {
    fn from(row: BlobRow) -> Self {
        FileDescriptor {
            id: row.id,
            name: row.name,
            size_bytes: row.size_bytes,
            content_type: row.content_type,
            container_id: row.container_id,
            container_name: row.container_name,
            connection_token: row.connection_token,
            storage_key: row.storage_key,
            uploaded_at: row.uploaded_at,
            upload_seq: row.upload_seq,
        }
    }
}

#[derive(Clone)]
pub struct PostgresBlobRepository {
    pool: PgPool,
}

impl PostgresBlobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BlobRepository for PostgresBlobRepository {
    #[tracing::instrument(skip(self, blob), fields(db.table = "blobs", db.operation = "upsert", blob.name = %blob.name))]
    async fn upsert_blob(&self, blob: NewBlob) -> Result<FileDescriptor, AppError> {
        let row = sqlx::query_as::<Postgres, BlobRow>(
            r#"
            WITH upserted AS (
                INSERT INTO blobs (id, container_id, name, size_bytes, content_type, storage_key)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (container_id, name) DO UPDATE
                SET size_bytes = EXCLUDED.size_bytes,
                    content_type = EXCLUDED.content_type,
                    storage_key = EXCLUDED.storage_key,
                    uploaded_at = NOW(),
                    upload_seq = nextval('blob_upload_seq')
                RETURNING id, container_id, name, size_bytes, content_type, storage_key, uploaded_at, upload_seq
            )
            SELECT u.id, u.name, u.size_bytes, u.content_type, u.container_id,
                   c.name AS container_name, c.connection_token,
                   u.storage_key, u.uploaded_at, u.upload_seq
            FROM upserted u
            JOIN containers c ON c.id = u.container_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(blob.container_id)
        .bind(&blob.name)
        .bind(blob.size_bytes)
        .bind(&blob.content_type)
        .bind(&blob.storage_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "blobs", db.operation = "select", db.record_id = %case_id))]
    async fn list_blobs_for_case(&self, case_id: Uuid) -> Result<Vec<FileDescriptor>, AppError> {
        let rows = sqlx::query_as::<Postgres, BlobRow>(
            r#"
            SELECT b.id, b.name, b.size_bytes, b.content_type, b.container_id,
                   c.name AS container_name, c.connection_token,
                   b.storage_key, b.uploaded_at, b.upload_seq
            FROM blobs b
            JOIN containers c ON c.id = b.container_id
            WHERE c.case_id = $1
            ORDER BY b.upload_seq
            "#,
        )
        .bind(case_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FileDescriptor::from).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "blobs", db.operation = "select", db.record_id = %case_id))]
    async fn find_blobs_by_name(
        &self,
        case_id: Uuid,
        name: &str,
        connection_token: Option<&str>,
    ) -> Result<Vec<FileDescriptor>, AppError> {
        let rows = sqlx::query_as::<Postgres, BlobRow>(
            r#"
            SELECT b.id, b.name, b.size_bytes, b.content_type, b.container_id,
                   c.name AS container_name, c.connection_token,
                   b.storage_key, b.uploaded_at, b.upload_seq
            FROM blobs b
            JOIN containers c ON c.id = b.container_id
            WHERE c.case_id = $1
              AND b.name = $2
              AND ($3::TEXT IS NULL OR c.connection_token = $3)
            ORDER BY b.upload_seq
            "#,
        )
        .bind(case_id)
        .bind(name)
        .bind(connection_token)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FileDescriptor::from).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "blobs", db.operation = "delete", db.record_id = %blob_id))]
    async fn delete_blob(&self, blob_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blobs WHERE id = $1")
            .bind(blob_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
