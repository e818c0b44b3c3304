//! API constants

/// Versioned prefix of the canonical JSON API
pub const API_PREFIX: &str = "/api/v0";

/// Multipart field carrying uploaded files (repeatable)
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the connection token
pub const CONNECTION_TOKEN_FIELD: &str = "connection_token";

/// Deprecated alias of [`CONNECTION_TOKEN_FIELD`] sent by older upload forms
pub const LEGACY_CONNECTION_TOKEN_FIELD: &str = "connectionId";
