//! Shared key generation for storage backends.
//!
//! Key format: `{account_group_id}/{relative_key}`.

use crate::traits::{StorageError, StorageResult};

/// Prefix that every object of an account namespace starts with.
pub fn namespace_prefix(account_group_id: &str) -> StorageResult<String> {
    if account_group_id.is_empty() {
        return Err(StorageError::InvalidKey(
            "account namespace is empty".to_string(),
        ));
    }
    if account_group_id.contains('/') {
        return Err(StorageError::InvalidKey(format!(
            "account namespace '{}' must not contain '/'",
            account_group_id
        )));
    }
    Ok(format!("{}/", account_group_id))
}

/// Full storage key for an object inside an account namespace.
pub fn object_key(account_group_id: &str, relative_key: &str) -> StorageResult<String> {
    let prefix = namespace_prefix(account_group_id)?;
    if relative_key.is_empty() {
        return Err(StorageError::InvalidKey("object key is empty".to_string()));
    }
    Ok(format!("{}{}", prefix, relative_key))
}
