//! CaseVault API Library
//!
//! This crate provides the HTTP API handlers, middleware, and application setup.

mod api_doc;
mod compat;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
