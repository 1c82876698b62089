use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::{AccountRecord, ServiceTier};

/// Longest relative object key a caller may request, in bytes
pub const MAX_OBJECT_KEY_BYTES: usize = 1024;

/// Untrusted request for an upload URL, as sent by the caller.
///
/// Carries no namespace or entitlement fields: `company_id`,
/// `service_tier` and `payed` in a payload are unknown fields and are dropped
/// during deserialization. Those values only ever come from the account record,
/// through [`AuthorizedContext::enrich`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadRequest {
    /// Stable identity key of the caller
    #[serde(rename = "sub")]
    #[validate(length(min = 1, max = 256, message = "sub must be between 1 and 256 characters"))]
    pub subject_id: String,
    /// Informational only
    #[serde(rename = "email", default)]
    pub display_email: String,
    /// Informational only
    #[serde(rename = "user_name", default)]
    pub display_name: String,
    /// Path relative to the account namespace
    #[serde(rename = "file_request")]
    #[validate(length(
        min = 1,
        max = 1024,
        message = "file_request must be between 1 and 1024 characters"
    ))]
    pub requested_object_key: String,
    /// Size of the file to upload, in bytes
    #[serde(rename = "file_size", default)]
    #[validate(range(min = 0, message = "file_size must not be negative"))]
    pub requested_file_size_bytes: i64,
}

impl UploadRequest {
    /// Parse and validate a raw JSON payload.
    ///
    /// A JSON syntax or shape error is returned with serde's message untouched.
    /// `max_file_size_bytes` is the per-request ceiling above which a size is
    /// rejected rather than evaluated against the quota.
    pub fn parse(body: &str, max_file_size_bytes: i64) -> Result<Self, AppError> {
        let request: UploadRequest = serde_json::from_str(body)?;
        request.validate()?;
        validate_object_key(&request.requested_object_key)?;

        if request.requested_file_size_bytes > max_file_size_bytes {
            return Err(AppError::MalformedRequest(format!(
                "file_size {} exceeds the maximum of {} bytes per upload",
                request.requested_file_size_bytes, max_file_size_bytes
            )));
        }

        Ok(request)
    }
}

/// Check that a caller-supplied key stays inside its namespace and is stored
/// under exactly the name requested.
pub fn validate_object_key(key: &str) -> Result<(), AppError> {
    if key.len() > MAX_OBJECT_KEY_BYTES {
        return Err(AppError::MalformedRequest(format!(
            "file_request must be at most {} bytes",
            MAX_OBJECT_KEY_BYTES
        )));
    }
    if key.starts_with('/') {
        return Err(AppError::MalformedRequest(
            "file_request must be a relative path".to_string(),
        ));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(AppError::MalformedRequest(
            "file_request must not contain '..' segments".to_string(),
        ));
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == ".")
    {
        return Err(AppError::MalformedRequest(
            "file_request must not contain empty or '.' segments".to_string(),
        ));
    }
    if key.chars().any(char::is_control) {
        return Err(AppError::MalformedRequest(
            "file_request must not contain control characters".to_string(),
        ));
    }
    Ok(())
}

/// Upload request enriched with server-resolved account state.
///
/// Only constructible from an [`UploadRequest`] and an [`AccountRecord`], and
/// immutable afterwards. Never deserialized and never persisted.
#[derive(Debug, Clone)]
pub struct AuthorizedContext {
    request: UploadRequest,
    account_group_id: String,
    service_tier: ServiceTier,
    is_paid: bool,
}

impl AuthorizedContext {
    pub fn enrich(request: UploadRequest, record: &AccountRecord) -> Self {
        Self {
            request,
            account_group_id: record.account_group_id.clone(),
            service_tier: record.service_tier,
            is_paid: record.is_paid,
        }
    }

    pub fn request(&self) -> &UploadRequest {
        &self.request
    }

    pub fn subject_id(&self) -> &str {
        &self.request.subject_id
    }

    pub fn requested_object_key(&self) -> &str {
        &self.request.requested_object_key
    }

    pub fn requested_file_size_bytes(&self) -> i64 {
        self.request.requested_file_size_bytes
    }

    pub fn account_group_id(&self) -> &str {
        &self.account_group_id
    }

    pub fn service_tier(&self) -> ServiceTier {
        self.service_tier
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }
}

/// Success payload returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrl {
    pub url: String,
}
