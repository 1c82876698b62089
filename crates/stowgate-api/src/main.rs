use stowgate_api::setup;
use stowgate_core::{Config, Platform};

// Use mimalloc as the global allocator for lower fragmentation, especially on
// musl-based Lambda and container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, backends, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    match config.platform() {
        Platform::Lambda => setup::server::run_lambda(router).await?,
        Platform::Server => setup::server::start_server(&config, router).await?,
    }

    Ok(())
}
