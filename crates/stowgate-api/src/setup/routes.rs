//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// `POST /` is an alias of `POST /upload-url` so a Lambda function URL or a
/// single-route API Gateway trigger reaches the handler without path mapping.
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/upload-url",
            post(handlers::upload_url::handle_upload_request),
        )
        .route("/", post(handlers::upload_url::handle_upload_request))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
