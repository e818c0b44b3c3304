//! Connection tokens and container name derivation.
//!
//! A connection token is generated by the browser to correlate one upload
//! session with the container it writes into. Tokens have the shape
//! `XXXX-XXXX-XXXX-XXXX` (ASCII alphanumerics). They are not globally unique,
//! so containers are keyed by the (case, token) pair and named by hashing both.

use crate::constants::{CONTAINER_HASH_HEX_LEN, CONTAINER_NAME_PREFIX};
use crate::AppError;
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9]{4}(-[A-Za-z0-9]{4}){3}$").expect("static token pattern")
});

const GROUPS: usize = 4;
const GROUP_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionToken(String);

impl ConnectionToken {
    /// Parse a caller-supplied token, rejecting anything outside the four-group format.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if !TOKEN_PATTERN.is_match(trimmed) {
            return Err(AppError::Validation(format!(
                "Invalid connection token '{}': expected four hyphen-separated groups of four alphanumeric characters",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh token for callers that did not send one.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let groups: Vec<String> = (0..GROUPS)
            .map(|_| {
                (&mut rng)
                    .sample_iter(&Alphanumeric)
                    .take(GROUP_LEN)
                    .map(char::from)
                    .collect()
            })
            .collect();
        Self(groups.join("-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ConnectionToken {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConnectionToken {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConnectionToken> for String {
    fn from(token: ConnectionToken) -> Self {
        token.0
    }
}

/// Derive the storage container name for a (case, token) pair.
///
/// The name is a pure function of its inputs so a retried provisioning request
/// lands on the same container without coordination. The output is lowercase
/// hex behind a fixed prefix, which keeps it valid for object stores that
/// restrict container names to `[a-z0-9-]`.
pub fn derive_container_name(case_name: &str, token: &ConnectionToken) -> String {
    let mut hasher = Sha256::new();
    hasher.update(case_name.as_bytes());
    hasher.update([0u8]);
    hasher.update(token.as_str().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!(
        "{}{}",
        CONTAINER_NAME_PREFIX,
        &digest[..CONTAINER_HASH_HEX_LEN]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_tokens() {
        let token = ConnectionToken::parse("AbC1-x9Zz-0000-qwer").unwrap();
        assert_eq!(token.as_str(), "AbC1-x9Zz-0000-qwer");

        let padded = ConnectionToken::parse("  abcd-efgh-ijkl-mnop ").unwrap();
        assert_eq!(padded.as_str(), "abcd-efgh-ijkl-mnop");
    }

    #[test]
    fn rejects_malformed_tokens() {
        for raw in [
            "",
            "abcd",
            "abcd-efgh-ijkl",
            "abcd-efgh-ijkl-mnopq",
            "abcd_efgh_ijkl_mnop",
            "ab!d-efgh-ijkl-mnop",
            "abcd-efgh-ijkl-mnop-qrst",
        ] {
            let err = ConnectionToken::parse(raw).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "accepted {raw:?}");
        }
    }

    #[test]
    fn generated_tokens_match_format() {
        for _ in 0..32 {
            let token = ConnectionToken::generate();
            assert!(ConnectionToken::parse(token.as_str()).is_ok(), "{token}");
        }
    }

    #[test]
    fn container_name_is_stable_and_scoped() {
        let token = ConnectionToken::parse("aaaa-bbbb-cccc-dddd").unwrap();
        let other = ConnectionToken::parse("aaaa-bbbb-cccc-eeee").unwrap();

        let first = derive_container_name("Smith v. Jones", &token);
        assert_eq!(first, derive_container_name("Smith v. Jones", &token));
        assert_ne!(first, derive_container_name("Smith v. Jones", &other));
        assert_ne!(first, derive_container_name("Smith v. Jonas", &token));

        assert!(first.starts_with("case-"));
        assert_eq!(first.len(), "case-".len() + 24);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn serde_round_trip_validates() {
        let json = serde_json::to_string(&ConnectionToken::parse("abcd-1234-efgh-5678").unwrap())
            .unwrap();
        assert_eq!(json, "\"abcd-1234-efgh-5678\"");
        assert!(serde_json::from_str::<ConnectionToken>("\"nope\"").is_err());
    }
}
