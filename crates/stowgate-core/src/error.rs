//! Error types module
//!
//! Every failure an upload authorization can end in is a variant of `AppError`.
//! Leaf collaborators return these values unchanged and the HTTP layer is the
//! only place that turns them into a response.
//!
//! The current wire contract answers every failure with `400 Bad Request` and
//! the client message as a plain-text body, so `http_status_code` is uniform.
//! The other metadata still differs per variant and drives logging.

use crate::models::ServiceTier;

/// Outward message for a subject with no usable account record.
pub const INVALID_USER_MESSAGE: &str = "Invalid User Request";

/// Outward message for any signing failure.
pub const SIGNING_FAILURE_MESSAGE: &str = "Unable to sign URL";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for policy denials worth noticing
    Warn,
    /// Error level - for backend failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "QUOTA_EXCEEDED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (the caller may retry)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Payload failed to parse or violates basic shape constraints.
    /// The message is the parse error text, passed through verbatim.
    #[error("{0}")]
    MalformedRequest(String),

    #[error("no account record for subject")]
    IdentityNotFound,

    #[error(
        "quota exceeded: {current_usage_bytes} bytes stored + {requested_bytes} bytes requested exceeds the {ceiling_bytes} byte limit of the {tier} tier"
    )]
    QuotaExceeded {
        tier: ServiceTier,
        current_usage_bytes: i64,
        requested_bytes: i64,
        ceiling_bytes: i64,
    },

    #[error("account is not paid: uploads require an active subscription")]
    Unpaid,

    #[error("{0}")]
    BackendUnavailable(String),

    #[error("signing failed: {0}")]
    SigningFailure(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::MalformedRequest(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (&'static str, bool, LogLevel) {
    match err {
        AppError::MalformedRequest(_) => ("MALFORMED_REQUEST", false, LogLevel::Debug),
        AppError::IdentityNotFound => ("IDENTITY_NOT_FOUND", false, LogLevel::Debug),
        AppError::QuotaExceeded { .. } => ("QUOTA_EXCEEDED", false, LogLevel::Warn),
        AppError::Unpaid => ("UNPAID", false, LogLevel::Debug),
        AppError::BackendUnavailable(_) => ("BACKEND_UNAVAILABLE", true, LogLevel::Error),
        AppError::SigningFailure(_) => ("SIGNING_FAILURE", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &str {
        match self {
            AppError::MalformedRequest(_) => "MalformedRequest",
            AppError::IdentityNotFound => "IdentityNotFound",
            AppError::QuotaExceeded { .. } => "QuotaExceeded",
            AppError::Unpaid => "Unpaid",
            AppError::BackendUnavailable(_) => "BackendUnavailable",
            AppError::SigningFailure(_) => "SigningFailure",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        400
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::IdentityNotFound => INVALID_USER_MESSAGE.to_string(),
            AppError::SigningFailure(_) => SIGNING_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
