//! Shared key generation and validation for storage backends.
//!
//! Key format: `{container}/{blob_name}`.

use crate::traits::{StorageError, StorageResult};

/// Build the storage key for a blob, validating both components.
pub fn blob_key(container: &str, blob_name: &str) -> StorageResult<String> {
    validate_segment(container, "container name")?;
    validate_segment(blob_name, "blob name")?;
    Ok(format!("{}/{}", container, blob_name))
}

/// Split a key back into (container, blob_name).
pub fn split_key(storage_key: &str) -> StorageResult<(&str, &str)> {
    validate_key(storage_key)?;
    storage_key
        .split_once('/')
        .ok_or_else(|| StorageError::InvalidKey(format!("'{}' has no container", storage_key)))
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_segment(segment: &str, what: &str) -> StorageResult<()> {
    if segment.is_empty()
        || segment == "."
        || segment.contains("..")
        || segment.contains('/')
        || segment.contains('\\')
    {
        return Err(StorageError::InvalidKey(format!(
            "Invalid {}: '{}'",
            what, segment
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_splits_keys() {
        let key = blob_key("case-abc", "report.pdf").unwrap();
        assert_eq!(key, "case-abc/report.pdf");
        assert_eq!(split_key(&key).unwrap(), ("case-abc", "report.pdf"));
    }

    #[test]
    fn rejects_traversal_and_nested_segments() {
        assert!(blob_key("case-abc", "../etc/passwd").is_err());
        assert!(blob_key("case-abc", "a/b").is_err());
        assert!(blob_key("", "a").is_err());
        assert!(split_key("/etc/passwd").is_err());
        assert!(split_key("no-container").is_err());
    }
}
