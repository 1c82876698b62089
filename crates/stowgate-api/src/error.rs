//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and use `?` on
//! anything convertible into `AppError`. Every failure is rendered the same
//! way: the metadata status code and the client message as a plain-text body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use stowgate_core::{AppError, ErrorMetadata, LogLevel};

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from stowgate-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    let recoverable = error.is_recoverable();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, recoverable, "Upload request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, recoverable, "Upload request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, code, recoverable, "Upload request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::BAD_REQUEST);

        log_error(app_error);

        (status, app_error.client_message()).into_response()
    }
}
