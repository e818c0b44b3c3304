//! Database setup and initialization

use anyhow::{Context, Result};
use casevault_core::{config::DatabaseBackend, Config};
use casevault_db::Repositories;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

/// Pick the repository implementation named by `DATABASE_URL`
pub async fn setup_repositories(config: &Config) -> Result<Repositories> {
    match config.database_backend() {
        Some(DatabaseBackend::Postgres) => {
            let pool = setup_database(config).await?;
            Ok(Repositories::postgres(pool))
        }
        Some(DatabaseBackend::Memory) => {
            tracing::warn!("Using in-memory repositories - all records are lost on restart");
            Ok(Repositories::in_memory())
        }
        None => Err(anyhow::anyhow!(
            "Unsupported DATABASE_URL scheme - expected postgres:// or memory://"
        )),
    }
}

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    // Workspace migrations/ relative to this crate
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
