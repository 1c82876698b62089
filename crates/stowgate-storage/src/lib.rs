//! Stowgate Storage Library
//!
//! This crate provides the object-storage seams used to authorize uploads:
//! paginated enumeration of an account namespace, usage accounting on top of
//! it, and pre-signed PUT URL generation.
//!
//! # Storage key format
//!
//! Every object an account owns lives under `{account_group_id}/`. The
//! namespace always comes from the account record; callers only supply the
//! relative part. Key construction is centralized in the `keys` module.

pub mod keys;
#[cfg(feature = "storage-s3")]
pub mod listing;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod usage;

// Re-export commonly used types
pub use keys::{namespace_prefix, object_key};
#[cfg(feature = "storage-s3")]
pub use listing::ObjectStoreLister;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{
    ObjectLister, ObjectPage, ObjectSummary, StorageError, StorageResult, UrlSigner,
};
pub use usage::UsageAccountant;
