//! Configuration module
//!
//! Everything is read from environment variables (a `.env` file is honoured
//! in development). Tier ceilings are fixed policy and live in `quota`.

use std::env;
use std::time::Duration;

use crate::platform::{LogFormat, Platform};

// Common constants
const SERVER_PORT: u16 = 4000;
const UPLOAD_URL_EXPIRY_SECS: u64 = 3 * 24 * 60 * 60;
/// SigV4 presigned URLs cannot outlive seven days
const MAX_UPLOAD_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;
/// Largest object a single presigned PUT can carry (5 GiB)
const MAX_UPLOAD_SIZE_BYTES: i64 = 5 * 1024 * 1024 * 1024;
const LIST_PAGE_SIZE: usize = 1000;

/// Base configuration shared by every entry point
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub platform: Platform,
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Upload gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base: BaseConfig,
    // Identity store
    pub dynamo_table: String,
    // Storage configuration
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    // Upload policy
    pub upload_url_expiry_secs: u64,
    pub max_upload_size_bytes: i64,
    pub list_page_size: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GatewayConfig>);

impl Config {
    fn as_gateway(&self) -> &GatewayConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_gateway().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = GatewayConfig::from_vars(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_gateway().validate()
    }

    // Convenience getters for common fields
    pub fn platform(&self) -> Platform {
        self.as_gateway().base.platform
    }

    pub fn server_port(&self) -> u16 {
        self.as_gateway().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_gateway().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_gateway().base.log_format
    }

    pub fn dynamo_table(&self) -> &str {
        &self.as_gateway().dynamo_table
    }

    pub fn s3_bucket(&self) -> &str {
        &self.as_gateway().s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.as_gateway().s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_gateway().s3_endpoint.as_deref()
    }

    pub fn upload_url_expiry(&self) -> Duration {
        Duration::from_secs(self.as_gateway().upload_url_expiry_secs)
    }

    pub fn max_upload_size_bytes(&self) -> i64 {
        self.as_gateway().max_upload_size_bytes
    }

    pub fn list_page_size(&self) -> usize {
        self.as_gateway().list_page_size
    }
}

impl GatewayConfig {
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            platform: lookup("PLATFORM")
                .unwrap_or_else(|| "server".to_string())
                .parse()?,
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .parse()?,
        };

        let config = GatewayConfig {
            base,
            dynamo_table: lookup("DYNAMO_TABLE")
                .filter(|s| !s.is_empty())
                .ok_or_else(|| anyhow::anyhow!("DYNAMO_TABLE must be set"))?,
            s3_bucket: lookup("S3_BUCKET")
                .filter(|s| !s.is_empty())
                .ok_or_else(|| anyhow::anyhow!("S3_BUCKET must be set"))?,
            s3_region: lookup("S3_REGION")
                .or_else(|| lookup("AWS_REGION"))
                .filter(|s| !s.is_empty())
                .ok_or_else(|| anyhow::anyhow!("S3_REGION or AWS_REGION must be set"))?,
            s3_endpoint: lookup("S3_ENDPOINT").filter(|s| !s.is_empty()),
            upload_url_expiry_secs: lookup("UPLOAD_URL_EXPIRY_SECS")
                .unwrap_or_else(|| UPLOAD_URL_EXPIRY_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("UPLOAD_URL_EXPIRY_SECS must be a valid number"))?,
            max_upload_size_bytes: lookup("MAX_UPLOAD_SIZE_BYTES")
                .unwrap_or_else(|| MAX_UPLOAD_SIZE_BYTES.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES must be a valid number"))?,
            list_page_size: lookup("LIST_PAGE_SIZE")
                .unwrap_or_else(|| LIST_PAGE_SIZE.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("LIST_PAGE_SIZE must be a valid number"))?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_url_expiry_secs == 0
            || self.upload_url_expiry_secs > MAX_UPLOAD_URL_EXPIRY_SECS
        {
            return Err(anyhow::anyhow!(
                "UPLOAD_URL_EXPIRY_SECS must be between 1 and {}",
                MAX_UPLOAD_URL_EXPIRY_SECS
            ));
        }

        if self.max_upload_size_bytes < 0 {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_BYTES must not be negative"
            ));
        }

        if self.list_page_size == 0 || self.list_page_size > LIST_PAGE_SIZE {
            return Err(anyhow::anyhow!(
                "LIST_PAGE_SIZE must be between 1 and {}",
                LIST_PAGE_SIZE
            ));
        }

        if let Some(endpoint) = &self.s3_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "S3_ENDPOINT must be an http:// or https:// URL"
                ));
            }
        }

        Ok(())
    }
}
