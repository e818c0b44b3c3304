use casevault_core::models::{Case, CaseStatus};
use casevault_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Case persistence. Name uniqueness is enforced here, atomically.
#[async_trait::async_trait]
pub trait CaseRepository: Send + Sync {
    /// Insert a case, failing with `DuplicateName` if the name is taken.
    async fn insert_case(&self, name: &str) -> Result<Case, AppError>;

    /// All cases in creation order
    async fn list_cases(&self) -> Result<Vec<Case>, AppError>;

    async fn find_case(&self, name: &str) -> Result<Option<Case>, AppError>;

    /// Mark a case archived. Returns `None` if no case has that name.
    async fn archive_case(&self, name: &str) -> Result<Option<Case>, AppError>;

    /// Readiness probe
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(sqlx::FromRow)]
struct CaseRow {
    id: Uuid,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CaseRow> for Case {
    type Error = AppError;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        Ok(Case {
            id: row.id,
            name: row.name,
            status: row.status.parse::<CaseStatus>()?,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PostgresCaseRepository {
    pool: PgPool,
}

impl PostgresCaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CaseRepository for PostgresCaseRepository {
    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "insert"))]
    async fn insert_case(&self, name: &str) -> Result<Case, AppError> {
        let row = sqlx::query_as::<Postgres, CaseRow>(
            r#"
            INSERT INTO cases (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::DuplicateName(name.to_string())),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "select"))]
    async fn list_cases(&self) -> Result<Vec<Case>, AppError> {
        let rows = sqlx::query_as::<Postgres, CaseRow>(
            r#"
            SELECT id, name, status, created_at
            FROM cases
            ORDER BY created_seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Case::try_from).collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "select"))]
    async fn find_case(&self, name: &str) -> Result<Option<Case>, AppError> {
        let row = sqlx::query_as::<Postgres, CaseRow>(
            r#"
            SELECT id, name, status, created_at
            FROM cases
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Case::try_from).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "cases", db.operation = "update"))]
    async fn archive_case(&self, name: &str) -> Result<Option<Case>, AppError> {
        let row = sqlx::query_as::<Postgres, CaseRow>(
            r#"
            UPDATE cases
            SET status = 'archived'
            WHERE name = $1
            RETURNING id, name, status, created_at
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Case::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
