use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{
        header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
        StatusCode,
    },
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use stowgate_core::{AppError, SignedUrl, UploadRequest};

/// Issue a presigned PUT URL for an upload the caller is entitled to.
///
/// The body is taken as raw text so that a JSON syntax error reaches the
/// caller as serde's own message instead of an extractor rejection.
#[tracing::instrument(skip(state, body), fields(body_bytes = body.len(), operation = "upload_url"))]
pub async fn handle_upload_request(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<impl IntoResponse, HttpAppError> {
    let start = std::time::Instant::now();

    let signed = issue_upload_url(&state, &body).await?;

    tracing::info!(
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload URL issued"
    );

    Ok((
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "*"),
        ],
        Json(signed),
    ))
}

/// Parse, authorize and sign, stopping at the first failure.
pub async fn issue_upload_url(state: &AppState, body: &str) -> Result<SignedUrl, AppError> {
    let request = UploadRequest::parse(body, state.max_upload_size_bytes)?;
    let context = state.authorizer.authorize(&request).await?;
    state.url_signer.sign(&context).await
}
