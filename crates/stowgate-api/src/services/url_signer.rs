use std::sync::Arc;
use std::time::Duration;

use stowgate_core::{AppError, AuthorizedContext, SignedUrl};
use stowgate_storage::{object_key, UrlSigner};

/// Issues presigned PUT URLs for authorized uploads.
#[derive(Clone)]
pub struct UploadUrlSigner {
    signer: Arc<dyn UrlSigner>,
    expires_in: Duration,
}

impl UploadUrlSigner {
    pub fn new(signer: Arc<dyn UrlSigner>, expires_in: Duration) -> Self {
        Self { signer, expires_in }
    }

    /// Sign a PUT for `{account_group_id}/{requested_object_key}`.
    ///
    /// Any backend failure, and an empty URL, is a `SigningFailure`.
    #[tracing::instrument(skip(self, context), fields(operation = "sign_upload_url"))]
    pub async fn sign(&self, context: &AuthorizedContext) -> Result<SignedUrl, AppError> {
        let key = object_key(context.account_group_id(), context.requested_object_key())
            .map_err(|e| AppError::SigningFailure(e.to_string()))?;

        let url = self
            .signer
            .presigned_put_url(&key, self.expires_in)
            .await
            .map_err(|e| AppError::SigningFailure(e.to_string()))?;

        if url.is_empty() {
            return Err(AppError::SigningFailure(format!(
                "signer returned an empty URL for '{}'",
                key
            )));
        }

        tracing::debug!(
            key = %key,
            expires_in_secs = self.expires_in.as_secs(),
            "Upload URL signed"
        );

        Ok(SignedUrl { url })
    }
}
