//! Limits and defaults shared by validation, configuration and services.

/// Default maximum length of a case name, in characters.
pub const DEFAULT_CASE_NAME_MAX_LENGTH: usize = 128;

/// Maximum length of a stored blob name after sanitization.
pub const MAX_BLOB_NAME_LENGTH: usize = 255;

/// Prefix of every derived container name.
pub const CONTAINER_NAME_PREFIX: &str = "case-";

/// Number of hex characters of the SHA-256 digest kept in a container name.
pub const CONTAINER_HASH_HEX_LEN: usize = 24;

/// Content type recorded when the uploader does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
