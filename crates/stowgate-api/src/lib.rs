//! Stowgate API Library
//!
//! This crate provides the HTTP handler that authorizes uploads, the services
//! behind it, and application setup for both the server and Lambda runtimes.

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::HttpAppError;
pub use services::{Authorizer, UploadUrlSigner};
pub use state::AppState;
