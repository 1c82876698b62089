//! Server startup, graceful shutdown and the Lambda entry point

use anyhow::Result;
use axum::Router;
use stowgate_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        bucket = %config.s3_bucket(),
        table = %config.dynamo_table(),
        url_expiry_secs = config.upload_url_expiry().as_secs(),
        max_upload_mb = config.max_upload_size_bytes() / 1024 / 1024,
        list_page_size = config.list_page_size(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Hand the router to the AWS Lambda HTTP runtime.
#[cfg(feature = "lambda")]
pub async fn run_lambda(app: Router) -> Result<()> {
    tracing::info!("Starting Lambda runtime");
    lambda_http::run(app)
        .await
        .map_err(|e| anyhow::anyhow!("Lambda runtime failed: {}", e))
}

#[cfg(not(feature = "lambda"))]
pub async fn run_lambda(_app: Router) -> Result<()> {
    anyhow::bail!("PLATFORM=lambda requires the `lambda` feature")
}

/// Signal handler for graceful shutdown
///
/// Listens for Ctrl+C (SIGINT) and SIGTERM signals to initiate graceful shutdown.
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
