//! Paged namespace enumeration over any `object_store` backend.
//!
//! Pages are cut client-side from the backend's listing stream. The marker
//! handed back is the last key of a full page, and the next page resumes
//! strictly after it with `list_with_offset`.
//!
//! A key the backend cannot represent as an `object_store` path (empty, `.`
//! or `..` segments, control characters) fails the whole backend page and
//! ends the stream, so such a namespace cannot be enumerated at all. That
//! surfaces as `StorageError::UnlistableKey` naming the namespace.

use crate::traits::{ObjectLister, ObjectPage, ObjectSummary, StorageError, StorageResult};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore};
use std::sync::Arc;

/// `ObjectLister` backed by an `object_store` implementation
#[derive(Clone)]
pub struct ObjectStoreLister {
    store: Arc<dyn ObjectStore>,
    page_size: usize,
}

impl ObjectStoreLister {
    pub fn new(store: Arc<dyn ObjectStore>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Parse a key or prefix without re-encoding it.
pub(crate) fn parse_path(raw: &str) -> StorageResult<Path> {
    Path::parse(raw).map_err(|e| StorageError::InvalidKey(e.to_string()))
}

/// Take up to `page_size` objects from a listing stream.
pub(crate) async fn collect_page(
    mut stream: BoxStream<'_, object_store::Result<ObjectMeta>>,
    page_size: usize,
) -> object_store::Result<ObjectPage> {
    let mut objects = Vec::with_capacity(page_size);
    while objects.len() < page_size {
        match stream.next().await {
            Some(meta) => {
                let meta = meta?;
                objects.push(ObjectSummary {
                    key: meta.location.to_string(),
                    size_bytes: meta.size,
                });
            }
            None => break,
        }
    }

    let continuation = if objects.len() == page_size {
        objects.last().map(|object| object.key.clone())
    } else {
        None
    };

    Ok(ObjectPage {
        objects,
        continuation,
    })
}

pub(crate) fn list_error(prefix: &str, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::InvalidPath { source } => StorageError::UnlistableKey(format!(
            "namespace '{}' holds a key that cannot be enumerated: {}",
            prefix, source
        )),
        other => StorageError::ListFailed(other.to_string()),
    }
}

#[async_trait]
impl ObjectLister for ObjectStoreLister {
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> StorageResult<ObjectPage> {
        let start = std::time::Instant::now();
        let prefix_path = parse_path(prefix)?;

        let stream = match continuation {
            Some(marker) => {
                let offset = parse_path(marker)?;
                self.store.list_with_offset(Some(&prefix_path), &offset)
            }
            None => self.store.list(Some(&prefix_path)),
        };

        let page = collect_page(stream, self.page_size).await.map_err(|e| {
            let err = list_error(prefix, e);
            match &err {
                StorageError::UnlistableKey(_) => tracing::warn!(
                    error = %err,
                    prefix = %prefix,
                    store = %self.store,
                    "Namespace contains a key object_store cannot parse"
                ),
                _ => tracing::error!(
                    error = %err,
                    prefix = %prefix,
                    store = %self.store,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object listing failed"
                ),
            }
            err
        })?;

        tracing::debug!(
            prefix = %prefix,
            object_count = page.objects.len(),
            has_more = page.continuation.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object list page successful"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::UsageAccountant;
    use object_store::memory::InMemory;
    use object_store::{ObjectStoreExt, PutPayload};
    use stowgate_core::AppError;

    async fn store_with(objects: &[(&str, usize)]) -> Arc<InMemory> {
        let store = Arc::new(InMemory::new());
        for (key, size) in objects {
            store
                .put(&Path::parse(*key).unwrap(), PutPayload::from(vec![0u8; *size]))
                .await
                .unwrap();
        }
        store
    }

    async fn drain(lister: &ObjectStoreLister, prefix: &str) -> Vec<ObjectPage> {
        let mut pages = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let page = lister
                .list_page(prefix, continuation.as_deref())
                .await
                .unwrap();
            continuation = page.continuation.clone();
            pages.push(page);
            if continuation.is_none() {
                return pages;
            }
        }
    }

    #[tokio::test]
    async fn test_exactly_full_pages_end_with_empty_page() {
        let store = store_with(&[
            ("acme/a", 1),
            ("acme/b", 2),
            ("acme/c", 3),
            ("acme/d", 4),
            ("acme-corp/x", 100),
        ])
        .await;
        let lister = ObjectStoreLister::new(store, 2);

        let pages = drain(&lister, "acme/").await;
        let sizes: Vec<Vec<u64>> = pages
            .iter()
            .map(|p| p.objects.iter().map(|o| o.size_bytes).collect())
            .collect();
        assert_eq!(sizes, vec![vec![1, 2], vec![3, 4], vec![]]);
        assert_eq!(pages[0].continuation.as_deref(), Some("acme/b"));
        assert_eq!(pages[1].continuation.as_deref(), Some("acme/d"));
    }

    #[tokio::test]
    async fn test_partial_last_page_has_no_marker() {
        let store = store_with(&[
            ("acme/a", 1),
            ("acme/b", 1),
            ("acme/c", 1),
            ("acme/d", 1),
            ("acme/e", 1),
        ])
        .await;
        let lister = ObjectStoreLister::new(store, 2);

        let pages = drain(&lister, "acme/").await;
        let counts: Vec<usize> = pages.iter().map(|p| p.objects.len()).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        assert!(pages[2].continuation.is_none());
    }

    #[tokio::test]
    async fn test_usage_totals_are_exact() {
        let objects = [
            ("acme/reports/q1.csv", 1_000),
            ("acme/reports/q2.csv", 2_000),
            ("acme/models/run.bin", 3_000),
            ("acme/a~b.txt", 4_000),
            ("acme/z", 5_000),
            ("globex/other.bin", 99_999),
        ];
        for page_size in [1, 2, 4, 5, 1000] {
            let store = store_with(&objects).await;
            let accountant =
                UsageAccountant::new(Arc::new(ObjectStoreLister::new(store, page_size)));
            assert_eq!(
                accountant.current_usage_bytes("acme").await.unwrap(),
                15_000,
                "page size {}",
                page_size
            );
        }
    }

    #[tokio::test]
    async fn test_empty_namespace() {
        let store = store_with(&[("globex/x", 10)]).await;
        let lister = ObjectStoreLister::new(store, 2);
        let page = lister.list_page("acme/", None).await.unwrap();
        assert!(page.objects.is_empty());
        assert!(page.continuation.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_key_is_reported() {
        let source = Path::parse("acme/a//b").unwrap_err();
        let stream =
            futures::stream::iter(vec![Err::<ObjectMeta, _>(object_store::Error::InvalidPath {
                source,
            })])
            .boxed();

        let err = list_error("acme/", collect_page(stream, 2).await.unwrap_err());
        assert!(matches!(err, StorageError::UnlistableKey(_)));
        assert!(err.to_string().contains("acme/"));
        assert!(matches!(
            AppError::from(err),
            AppError::BackendUnavailable(_)
        ));
    }

    #[test]
    fn test_page_size_is_at_least_one() {
        let lister = ObjectStoreLister::new(Arc::new(InMemory::new()), 0);
        assert_eq!(lister.page_size(), 1);
    }
}
