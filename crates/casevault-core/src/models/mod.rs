//! Data models for the application
//!
//! Each sub-module represents one entity of the case/container/file model
//! together with its request and response DTOs.

mod blob;
mod case;
mod container;
mod summary;

pub use blob::*;
pub use case::*;
pub use container::*;
pub use summary::*;
