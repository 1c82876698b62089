//! Backend clients and service initialization

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use stowgate_core::Config;
use stowgate_db::DynamoAccountRepository;
use stowgate_storage::S3Storage;

/// Build the DynamoDB identity store, the S3 backend and the application state
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let accounts = DynamoAccountRepository::from_region(
        config.s3_region(),
        config.dynamo_table().to_string(),
    )
    .await;
    tracing::info!(table = %config.dynamo_table(), "Identity store initialized");

    let storage = Arc::new(
        S3Storage::new(
            config.s3_bucket().to_string(),
            config.s3_region().to_string(),
            config.s3_endpoint().map(String::from),
            config.list_page_size(),
        )
        .context("Failed to initialize S3 storage")?,
    );
    tracing::info!(
        bucket = %config.s3_bucket(),
        region = %config.s3_region(),
        endpoint = ?config.s3_endpoint(),
        "S3 storage initialized"
    );

    Ok(Arc::new(AppState::new(
        Arc::new(accounts),
        storage.clone(),
        storage,
        config.upload_url_expiry(),
        config.max_upload_size_bytes(),
    )))
}
