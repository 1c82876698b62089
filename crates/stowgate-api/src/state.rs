//! Application state shared by every request.
//!
//! Holds only immutable settings and the services built around thread-safe
//! backend clients. Nothing here is mutated after startup.

use crate::services::{Authorizer, UploadUrlSigner};
use std::sync::Arc;
use std::time::Duration;
use stowgate_db::AccountRepository;
use stowgate_storage::{ObjectLister, UrlSigner, UsageAccountant};

#[derive(Clone)]
pub struct AppState {
    pub authorizer: Authorizer,
    pub url_signer: UploadUrlSigner,
    /// Per-request file size ceiling; larger sizes are rejected as malformed
    pub max_upload_size_bytes: i64,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        lister: Arc<dyn ObjectLister>,
        signer: Arc<dyn UrlSigner>,
        upload_url_expiry: Duration,
        max_upload_size_bytes: i64,
    ) -> Self {
        Self {
            authorizer: Authorizer::new(accounts, UsageAccountant::new(lister)),
            url_signer: UploadUrlSigner::new(signer, upload_url_expiry),
            max_upload_size_bytes,
        }
    }
}
