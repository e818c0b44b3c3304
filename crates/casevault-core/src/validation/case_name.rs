//! Case name rules.
//!
//! Names are caller-supplied and compared exactly after trimming surrounding
//! whitespace. The charset is deliberately narrow so names survive URLs,
//! log lines and the legacy HTML views unescaped.

use crate::constants::DEFAULT_CASE_NAME_MAX_LENGTH;
use crate::AppError;
use std::sync::LazyLock;

static CASE_NAME_CHARSET: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9 _.\-]+$").expect("static case name pattern")
});

/// Length limit applied to case names, configurable per deployment.
#[derive(Debug, Clone, Copy)]
pub struct CaseNamePolicy {
    pub max_length: usize,
}

impl Default for CaseNamePolicy {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_CASE_NAME_MAX_LENGTH,
        }
    }
}

impl CaseNamePolicy {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Validate a raw name and return its normalized form.
    pub fn validate(&self, raw: &str) -> Result<String, AppError> {
        let name = normalize_case_name(raw);

        if name.is_empty() {
            return Err(AppError::InvalidName("name must not be empty".to_string()));
        }

        let length = name.chars().count();
        if length > self.max_length {
            return Err(AppError::InvalidName(format!(
                "name is {} characters long, the maximum is {}",
                length, self.max_length
            )));
        }

        if !CASE_NAME_CHARSET.is_match(name) {
            return Err(AppError::InvalidName(
                "only letters, digits, spaces, '.', '-' and '_' are allowed".to_string(),
            ));
        }

        Ok(name.to_string())
    }
}

/// Trim surrounding whitespace; lookups use the same normalization as creation.
pub fn normalize_case_name(raw: &str) -> &str {
    raw.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_valid_names() {
        let policy = CaseNamePolicy::default();
        assert_eq!(policy.validate("  Smith v. Jones 2024 ").unwrap(), "Smith v. Jones 2024");
        assert_eq!(policy.validate("case_01-b").unwrap(), "case_01-b");
    }

    #[test]
    fn rejects_empty_names() {
        let policy = CaseNamePolicy::default();
        assert!(matches!(policy.validate(""), Err(AppError::InvalidName(_))));
        assert!(matches!(policy.validate("   \t"), Err(AppError::InvalidName(_))));
    }

    #[test]
    fn rejects_names_over_the_limit() {
        let policy = CaseNamePolicy::new(8);
        assert!(policy.validate("12345678").is_ok());
        assert!(matches!(policy.validate("123456789"), Err(AppError::InvalidName(_))));
    }

    #[test]
    fn rejects_names_outside_the_charset() {
        let policy = CaseNamePolicy::default();
        for raw in ["a/b", "<script>", "case\nname", "naïve", "semi;colon"] {
            assert!(
                matches!(policy.validate(raw), Err(AppError::InvalidName(_))),
                "accepted {raw:?}"
            );
        }
    }
}
