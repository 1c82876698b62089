//! Storage abstraction traits
//!
//! Backends implement `ObjectLister` for usage accounting and `UrlSigner` for
//! handing out upload URLs. Both are read-only from the backend's point of view.

use async_trait::async_trait;
use std::time::Duration;
use stowgate_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Unlistable key: {0}")]
    UnlistableKey(String),

    #[error("Usage overflow: {0}")]
    UsageOverflow(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SigningFailed(msg) => AppError::SigningFailure(msg),
            other => AppError::BackendUnavailable(other.to_string()),
        }
    }
}

/// One object in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size_bytes: u64,
}

/// One page of a listing.
///
/// `continuation` is `Some` while the backend has more objects to return and
/// must be passed back verbatim to fetch the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub objects: Vec<ObjectSummary>,
    pub continuation: Option<String>,
}

/// Paginated enumeration of objects under a prefix
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Fetch one page of objects whose keys start with `prefix`.
    ///
    /// `continuation` is `None` for the first page and the previous page's
    /// marker afterwards.
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StorageResult<ObjectPage>;
}

/// Pre-signed URL generation
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Generate a presigned PUT URL for a direct upload to `storage_key`.
    ///
    /// The URL is opaque to callers and valid for `expires_in`.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;
}
