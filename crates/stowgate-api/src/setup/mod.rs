//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use stowgate_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        platform = %config.platform(),
        environment = %config.environment(),
        production = config.is_production(),
        "Configuration loaded and validated successfully"
    );

    // Identity store, object storage and the services built on them
    let state = services::initialize_services(&config).await?;

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
