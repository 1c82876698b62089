//! Usage accounting: total bytes stored by one account.

use std::sync::Arc;

use crate::keys::namespace_prefix;
use crate::traits::{ObjectLister, StorageError, StorageResult};

/// Sums object sizes across every page of an account namespace.
#[derive(Clone)]
pub struct UsageAccountant {
    lister: Arc<dyn ObjectLister>,
}

impl UsageAccountant {
    pub fn new(lister: Arc<dyn ObjectLister>) -> Self {
        Self { lister }
    }

    /// Total size in bytes of all objects under `{account_group_id}/`.
    ///
    /// Drains every page before returning; an empty namespace is 0.
    #[tracing::instrument(skip(self), fields(operation = "current_usage_bytes"))]
    pub async fn current_usage_bytes(&self, account_group_id: &str) -> StorageResult<i64> {
        let prefix = namespace_prefix(account_group_id)?;
        let start = std::time::Instant::now();

        let mut total: i64 = 0;
        let mut object_count: usize = 0;
        let mut pages: usize = 0;
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .lister
                .list_page(&prefix, continuation.as_deref())
                .await?;
            pages += 1;

            for object in &page.objects {
                total = i64::try_from(object.size_bytes)
                    .ok()
                    .and_then(|size| total.checked_add(size))
                    .ok_or_else(|| {
                        StorageError::UsageOverflow(format!(
                            "usage of '{}' does not fit in 64 bits",
                            prefix
                        ))
                    })?;
            }
            object_count += page.objects.len();

            match page.continuation {
                Some(next) if continuation.as_deref() == Some(next.as_str()) => {
                    return Err(StorageError::ListFailed(format!(
                        "listing of '{}' did not advance past '{}'",
                        prefix, next
                    )));
                }
                Some(next) => continuation = Some(next),
                None => break,
            }
        }

        tracing::debug!(
            prefix = %prefix,
            usage_bytes = total,
            object_count,
            pages,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Computed namespace usage"
        );

        Ok(total)
    }
}
