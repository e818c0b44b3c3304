//! Validation modules

pub mod blob_name;
pub mod case_name;

pub use blob_name::sanitize_blob_name;
pub use case_name::{normalize_case_name, CaseNamePolicy};
