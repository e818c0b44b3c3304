use casevault_core::models::Container;
use casevault_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Container persistence, keyed by (case, connection token)
#[async_trait::async_trait]
pub trait ContainerRepository: Send + Sync {
    /// Insert the container for (case_id, token) or return the existing one.
    ///
    /// Concurrent callers for the same pair all receive the same row.
    async fn claim_container(
        &self,
        case_id: Uuid,
        connection_token: &str,
        name: &str,
    ) -> Result<Container, AppError>;

    /// Containers of a case in creation order
    async fn list_containers(&self, case_id: Uuid) -> Result<Vec<Container>, AppError>;
}

#[derive(sqlx::FromRow)]
struct ContainerRow {
    id: Uuid,
    case_id: Uuid,
    connection_token: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<ContainerRow> for Container {
    fn from(row: ContainerRow) -> Self {
        Container {
            id: row.id,
            case_id: row.case_id,
            connection_token: row.connection_token,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresContainerRepository {
    pool: PgPool,
}

impl PostgresContainerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContainerRepository for PostgresContainerRepository {
    #[tracing::instrument(skip(self), fields(db.table = "containers", db.operation = "upsert", db.record_id = %case_id))]
    async fn claim_container(
        &self,
        case_id: Uuid,
        connection_token: &str,
        name: &str,
    ) -> Result<Container, AppError> {
        let inserted = sqlx::query_as::<Postgres, ContainerRow>(
            r#"
            INSERT INTO containers (id, case_id, connection_token, name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (case_id, connection_token) DO NOTHING
            RETURNING id, case_id, connection_token, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(case_id)
        .bind(connection_token)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            tracing::debug!(container = %row.name, "Allocated container");
            return Ok(row.into());
        }

        // Lost the race or already provisioned: the row exists now.
        let existing = sqlx::query_as::<Postgres, ContainerRow>(
            r#"
            SELECT id, case_id, connection_token, name, created_at
            FROM containers
            WHERE case_id = $1 AND connection_token = $2
            "#,
        )
        .bind(case_id)
        .bind(connection_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(existing.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "containers", db.operation = "select", db.record_id = %case_id))]
    async fn list_containers(&self, case_id: Uuid) -> Result<Vec<Container>, AppError> {
        let rows = sqlx::query_as::<Postgres, ContainerRow>(
            r#"
            SELECT id, case_id, connection_token, name, created_at
            FROM containers
            WHERE case_id = $1
            ORDER BY created_seq
            "#,
        )
        .bind(case_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Container::from).collect())
    }
}
