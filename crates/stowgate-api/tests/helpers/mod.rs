//! In-memory backends and a test server wired through the real router.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stowgate_api::setup::routes::setup_routes;
use stowgate_api::AppState;
use stowgate_core::{AccountRecord, AppError, ServiceTier};
use stowgate_db::AccountRepository;
use stowgate_storage::{
    ObjectLister, ObjectPage, ObjectSummary, StorageError, StorageResult, UrlSigner,
};

pub const MAX_UPLOAD_SIZE_BYTES: i64 = 5 * 1024 * 1024 * 1024;
pub const URL_EXPIRY: Duration = Duration::from_secs(3 * 24 * 60 * 60);

#[derive(Default)]
pub struct FakeAccounts {
    records: HashMap<String, AccountRecord>,
}

#[async_trait]
impl AccountRepository for FakeAccounts {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<AccountRecord>, AppError> {
        Ok(self.records.get(subject_id).cloned())
    }
}

/// Namespace listing served two objects per page, so any namespace with
/// more than two objects exercises pagination.
#[derive(Default)]
pub struct FakeLister {
    objects: HashMap<String, Vec<u64>>,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

const FAKE_PAGE_SIZE: usize = 2;

#[async_trait]
impl ObjectLister for FakeLister {
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StorageResult<ObjectPage> {
        self.calls
            .lock()
            .unwrap()
            .push((prefix.to_string(), continuation.map(String::from)));

        let sizes = self.objects.get(prefix).cloned().unwrap_or_default();
        let start: usize = match continuation {
            Some(marker) => marker
                .parse()
                .map_err(|_| StorageError::ListFailed(format!("bad marker '{}'", marker)))?,
            None => 0,
        };
        let end = (start + FAKE_PAGE_SIZE).min(sizes.len());
        let objects = sizes[start.min(end)..end]
            .iter()
            .enumerate()
            .map(|(i, size)| ObjectSummary {
                key: format!("{}file-{}", prefix, start + i),
                size_bytes: *size,
            })
            .collect();
        let continuation = (end < sizes.len()).then(|| end.to_string());

        Ok(ObjectPage {
            objects,
            continuation,
        })
    }
}

pub enum SignerMode {
    Succeed,
    ReturnEmpty,
    Fail,
}

pub struct FakeSigner {
    mode: SignerMode,
    pub signed_keys: Mutex<Vec<String>>,
}

#[async_trait]
impl UrlSigner for FakeSigner {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.signed_keys
            .lock()
            .unwrap()
            .push(storage_key.to_string());
        match self.mode {
            SignerMode::Succeed => Ok(format!(
                "https://uploads.example.com/{}?X-Amz-Expires={}&X-Amz-Signature=fake",
                storage_key,
                expires_in.as_secs()
            )),
            SignerMode::ReturnEmpty => Ok(String::new()),
            SignerMode::Fail => Err(StorageError::SigningFailed(
                "credentials expired".to_string(),
            )),
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub lister: Arc<FakeLister>,
    pub signer: Arc<FakeSigner>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn signed_keys(&self) -> Vec<String> {
        self.signer.signed_keys.lock().unwrap().clone()
    }

    pub fn listed_prefixes(&self) -> Vec<String> {
        self.lister
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prefix, _)| prefix.clone())
            .collect()
    }
}

/// Builder for a test application backed by in-memory fakes
pub struct TestAppBuilder {
    accounts: FakeAccounts,
    lister: FakeLister,
    signer_mode: SignerMode,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            accounts: FakeAccounts::default(),
            lister: FakeLister::default(),
            signer_mode: SignerMode::Succeed,
        }
    }

    pub fn account(mut self, sub: &str, group: &str, tier: ServiceTier, is_paid: bool) -> Self {
        self.accounts.records.insert(
            sub.to_string(),
            AccountRecord {
                subject_id: sub.to_string(),
                account_group_id: group.to_string(),
                service_tier: tier,
                is_paid,
            },
        );
        self
    }

    /// Objects already stored under `{group}/`, by size
    pub fn stored(mut self, group: &str, sizes: Vec<u64>) -> Self {
        self.lister.objects.insert(format!("{}/", group), sizes);
        self
    }

    pub fn signer(mut self, mode: SignerMode) -> Self {
        self.signer_mode = mode;
        self
    }

    pub fn build(self) -> TestApp {
        let lister = Arc::new(self.lister);
        let signer = Arc::new(FakeSigner {
            mode: self.signer_mode,
            signed_keys: Mutex::new(Vec::new()),
        });
        let state = Arc::new(AppState::new(
            Arc::new(self.accounts),
            lister.clone(),
            signer.clone(),
            URL_EXPIRY,
            MAX_UPLOAD_SIZE_BYTES,
        ));
        let app = setup_routes(state);
        let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

        TestApp {
            server,
            lister,
            signer,
        }
    }
}
