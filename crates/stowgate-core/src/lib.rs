//! Stowgate Core Library
//!
//! This crate provides the domain models, error taxonomy, quota policy and
//! configuration shared by every Stowgate component.

pub mod config;
pub mod error;
pub mod models;
pub mod platform;
pub mod quota;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GatewayConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AccountRecord, AuthorizedContext, ServiceTier, SignedUrl, UploadRequest};
pub use platform::{LogFormat, Platform};
pub use quota::{ceiling_bytes, decide, DenyReason, QuotaDecision};
