//! Configuration module
//!
//! This module provides configuration structures for the API and services,
//! including server, database, storage and upload-limit settings. Values are
//! read from the environment (optionally seeded from a `.env` file).

use std::env;
use std::str::FromStr;

use crate::constants::DEFAULT_CASE_NAME_MAX_LENGTH;
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const MAX_FILE_SIZE_MB: usize = 25;
const MAX_FILES_PER_UPLOAD: usize = 50;
const UPLOAD_CONCURRENCY: usize = 4;
const LOCAL_STORAGE_PATH: &str = "./data/blobs";

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Invalid LOG_FORMAT: {}", other)),
        }
    }
}

/// Which repository implementation `DATABASE_URL` selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    /// `memory://` - process-local, for development and tests
    Memory,
}

impl DatabaseBackend {
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(DatabaseBackend::Postgres)
        } else if url.starts_with("memory://") {
            Some(DatabaseBackend::Memory)
        } else {
            None
        }
    }
}

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
    pub request_timeout_secs: u64,
    /// In-flight request cap of the whole router
    pub http_concurrency_limit: usize,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Case storage service configuration
#[derive(Clone, Debug)]
pub struct CaseVaultConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    // Upload limits
    pub max_file_size_bytes: usize,
    pub max_files_per_upload: usize,
    pub upload_concurrency: usize,
    // Case registry
    pub case_name_max_length: usize,
    // Deprecated client shapes (form-encoded creation, bare listings, POST deletes)
    pub legacy_compat_enabled: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<CaseVaultConfig>);

impl Config {
    fn inner(&self) -> &CaseVaultConfig {
        &self.0
    }

    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config(Box::new(CaseVaultConfig::from_lookup(lookup)?)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().base.log_format
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn database_backend(&self) -> Option<DatabaseBackend> {
        DatabaseBackend::from_url(&self.inner().database_url)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn local_storage_path(&self) -> &str {
        &self.inner().local_storage_path
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn max_files_per_upload(&self) -> usize {
        self.inner().max_files_per_upload
    }

    pub fn upload_concurrency(&self) -> usize {
        self.inner().upload_concurrency
    }

    pub fn case_name_max_length(&self) -> usize {
        self.inner().case_name_max_length
    }

    pub fn legacy_compat_enabled(&self) -> bool {
        self.inner().legacy_compat_enabled
    }

    /// Largest request body the upload endpoint can legitimately receive.
    pub fn max_request_body_bytes(&self) -> usize {
        // Multipart framing overhead on top of the raw file bytes.
        const MULTIPART_SLACK_BYTES: usize = 1024 * 1024;
        self.max_file_size_bytes()
            .saturating_mul(self.max_files_per_upload())
            .saturating_add(MULTIPART_SLACK_BYTES)
    }
}

fn is_production_environment(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(v) if ["1", "true", "yes", "on"].contains(&v.as_str()) => true,
        Some(v) if ["0", "false", "no", "off"].contains(&v.as_str()) => false,
        _ => default,
    }
}

impl CaseVaultConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_environment(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::Pretty,
        };

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let max_file_size_mb = parse_or(lookup("MAX_FILE_SIZE_MB"), MAX_FILE_SIZE_MB);

        Ok(Self {
            base: BaseConfig {
                server_port: parse_or(lookup("SERVER_PORT"), SERVER_PORT),
                cors_origins,
                environment,
                log_format,
                request_timeout_secs: parse_or(
                    lookup("REQUEST_TIMEOUT_SECS"),
                    REQUEST_TIMEOUT_SECS,
                ),
                http_concurrency_limit: parse_or(
                    lookup("HTTP_CONCURRENCY_LIMIT"),
                    HTTP_CONCURRENCY_LIMIT,
                )
                .max(1),
                db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), DB_MAX_CONNECTIONS),
                db_timeout_seconds: parse_or(lookup("DB_TIMEOUT_SECONDS"), DB_TIMEOUT_SECS),
            },
            database_url,
            storage_backend,
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_files_per_upload: parse_or(lookup("MAX_FILES_PER_UPLOAD"), MAX_FILES_PER_UPLOAD),
            upload_concurrency: parse_or(lookup("UPLOAD_CONCURRENCY"), UPLOAD_CONCURRENCY),
            case_name_max_length: parse_or(
                lookup("CASE_NAME_MAX_LENGTH"),
                DEFAULT_CASE_NAME_MAX_LENGTH,
            ),
            legacy_compat_enabled: parse_bool(lookup("LEGACY_COMPAT_ENABLED"), true),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if DatabaseBackend::from_url(&self.database_url).is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a PostgreSQL connection string or memory://"
            ));
        }

        if is_production_environment(&self.base.environment)
            && DatabaseBackend::from_url(&self.database_url) == Some(DatabaseBackend::Memory)
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL=memory:// is not allowed in production"
            ));
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.trim().is_empty()
        {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.max_files_per_upload == 0 {
            return Err(anyhow::anyhow!("MAX_FILES_PER_UPLOAD must be greater than 0"));
        }

        if self.upload_concurrency == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CONCURRENCY must be greater than 0"));
        }

        if self.case_name_max_length == 0 {
            return Err(anyhow::anyhow!("CASE_NAME_MAX_LENGTH must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "memory://")])).unwrap();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.storage_backend(), StorageBackend::Local);
        assert_eq!(config.max_file_size_bytes(), 25 * 1024 * 1024);
        assert_eq!(config.max_files_per_upload(), 50);
        assert_eq!(config.upload_concurrency(), 4);
        assert_eq!(config.case_name_max_length(), 128);
        assert_eq!(config.http_concurrency_limit(), 10_000);
        assert_eq!(config.log_format(), LogFormat::Pretty);
        assert!(config.legacy_compat_enabled());
        assert_eq!(config.database_backend(), Some(DatabaseBackend::Memory));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://u:p@localhost/casevault"),
            ("SERVER_PORT", "8080"),
            ("STORAGE_BACKEND", "memory"),
            ("MAX_FILE_SIZE_MB", "2"),
            ("LOG_FORMAT", "json"),
            ("LEGACY_COMPAT_ENABLED", "false"),
            ("HTTP_CONCURRENCY_LIMIT", "64"),
        ]))
        .unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.http_concurrency_limit(), 64);
        assert_eq!(config.storage_backend(), StorageBackend::Memory);
        assert_eq!(config.max_file_size_bytes(), 2 * 1024 * 1024);
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(!config.legacy_compat_enabled());
        assert_eq!(config.database_backend(), Some(DatabaseBackend::Postgres));
    }

    #[test]
    fn production_rejects_wildcard_cors_and_memory_database() {
        assert!(Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("ENVIRONMENT", "production"),
        ]))
        .is_err());

        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("ENVIRONMENT", "prod"),
            ("CORS_ORIGINS", "https://cases.example.org"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_database_scheme_and_zero_limits() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://localhost/db")])).unwrap();
        assert!(config.validate().is_err());

        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("UPLOAD_CONCURRENCY", "0"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn http_concurrency_limit_is_at_least_one() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("HTTP_CONCURRENCY_LIMIT", "0"),
        ]))
        .unwrap();
        assert_eq!(config.http_concurrency_limit(), 1);
    }
}
