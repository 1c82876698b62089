use crate::listing::{parse_path, ObjectStoreLister};
use crate::traits::{ObjectLister, ObjectPage, StorageError, StorageResult, UrlSigner};
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::signer::Signer;
use std::sync::Arc;
use std::time::Duration;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    lister: ObjectStoreLister,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `page_size` - Number of objects returned per listing page
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        page_size: usize,
    ) -> StorageResult<Self> {
        // Credentials come from the environment / instance profile.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;
        let lister = ObjectStoreLister::new(Arc::new(store.clone()), page_size);

        Ok(S3Storage {
            store,
            lister,
            bucket,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectLister for S3Storage {
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StorageResult<ObjectPage> {
        self.lister.list_page(prefix, continuation).await
    }
}

#[async_trait]
impl UrlSigner for S3Storage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        // The signed object must be exactly `storage_key`; parsing strips a
        // trailing '/', so compare before signing.
        let location = parse_path(storage_key)?;
        if location.as_ref() != storage_key {
            return Err(StorageError::InvalidKey(format!(
                "'{}' would be stored as '{}'",
                storage_key, location
            )));
        }

        let url = self
            .store
            .signed_url(Method::PUT, &location, expires_in)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 presign failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            expires_in_secs = expires_in.as_secs(),
            "S3 presigned PUT URL generated"
        );

        Ok(url)
    }
}
