//! Blob name sanitization for uploaded files.

use crate::constants::MAX_BLOB_NAME_LENGTH;
use crate::AppError;

/// Reduce an uploaded filename to a safe blob name.
///
/// Directory components are dropped, characters outside `[A-Za-z0-9._-]` are
/// replaced with `_`, and the result is capped at 255 characters. Names that
/// try to traverse (`..`) or that sanitize down to nothing are rejected so two
/// different uploads never silently collapse onto a placeholder name.
pub fn sanitize_blob_name(filename: &str) -> Result<String, AppError> {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if filename_only.contains("..") {
        return Err(AppError::Validation(format!(
            "File name '{}' contains invalid path traversal",
            filename
        )));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_BLOB_NAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.' || c == '_') {
        return Err(AppError::Validation(format!(
            "File name '{}' is empty or has no usable characters",
            filename
        )));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(sanitize_blob_name("report-2024_v2.pdf").unwrap(), "report-2024_v2.pdf");
    }

    #[test]
    fn strips_directories_and_replaces_unsafe_characters() {
        assert_eq!(sanitize_blob_name("C:\\Users\\me\\scan 01.png").unwrap(), "scan_01.png");
        assert_eq!(sanitize_blob_name("nested/dir/évidence.txt").unwrap(), "_vidence.txt");
    }

    #[test]
    fn rejects_traversal_and_empty_names() {
        assert!(matches!(sanitize_blob_name("..secret"), Err(AppError::Validation(_))));
        assert!(matches!(sanitize_blob_name(""), Err(AppError::Validation(_))));
        assert!(matches!(sanitize_blob_name("dir/"), Err(AppError::Validation(_))));
        assert!(matches!(sanitize_blob_name("???"), Err(AppError::Validation(_))));
    }

    #[test]
    fn caps_length() {
        let long = "a".repeat(400);
        assert_eq!(sanitize_blob_name(&long).unwrap().len(), MAX_BLOB_NAME_LENGTH);
    }
}
