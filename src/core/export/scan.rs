//! Lazy key enumeration
//!
//! Turns the paged [`RecordStore::scan_page`] API into a stream of keys so
//! the coordinator never holds more than one page in memory.

use crate::adapters::store::{RecordStore, StoreResult};
use crate::domain::StoreError;
use futures::stream::{self, Stream, TryStreamExt};

enum ScanState {
    Start,
    Continue(String),
    Done,
}

/// Stream every key starting with `prefix`
///
/// Keys are yielded in store order, page by page. The first store error is
/// yielded as an item and ends the stream.
pub fn scan_keys<'a>(
    store: &'a dyn RecordStore,
    prefix: &'a str,
    page_size: usize,
) -> impl Stream<Item = StoreResult<String>> + Send + 'a {
    stream::try_unfold(ScanState::Start, move |state| {
        next_page(store, prefix, page_size, state)
    })
    .map_ok(|keys| stream::iter(keys.into_iter().map(Ok::<String, StoreError>)))
    .try_flatten()
}

async fn next_page(
    store: &dyn RecordStore,
    prefix: &str,
    page_size: usize,
    state: ScanState,
) -> StoreResult<Option<(Vec<String>, ScanState)>> {
    let cursor = match state {
        ScanState::Start => None,
        ScanState::Continue(cursor) => Some(cursor),
        ScanState::Done => return Ok(None),
    };

    let page = store
        .scan_page(prefix, cursor.as_deref(), page_size)
        .await?;

    tracing::trace!(
        prefix = prefix,
        keys = page.keys.len(),
        more = page.cursor.is_some(),
        "Fetched scan page"
    );

    let next = match page.cursor {
        Some(cursor) => ScanState::Continue(cursor),
        None => ScanState::Done,
    };
    Ok(Some((page.keys, next)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::adapters::store::ScanPage;
    use async_trait::async_trait;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_scan_keys_walks_all_pages() {
        let store = MemoryStore::from_entries(
            (0..7).map(|i| (format!("lead_{i}"), "{}".to_string())),
        );
        store.insert("email_a@x.com", "{}");

        let keys: Vec<String> = scan_keys(&store, "lead_", 3).try_collect().await.unwrap();
        assert_eq!(keys.len(), 7);
        assert!(keys.iter().all(|k| k.starts_with("lead_")));
    }

    #[tokio::test]
    async fn test_scan_keys_empty_store() {
        let store = MemoryStore::new();
        let keys: Vec<String> = scan_keys(&store, "lead_", 10).try_collect().await.unwrap();
        assert!(keys.is_empty());
    }

    /// Serves one page with an empty key list, then one page, then fails
    struct PagedStore;

    #[async_trait]
    impl RecordStore for PagedStore {
        fn backend_name(&self) -> &'static str {
            "paged"
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }

        async fn scan_page(
            &self,
            _prefix: &str,
            cursor: Option<&str>,
            _count: usize,
        ) -> StoreResult<ScanPage> {
            match cursor {
                None => Ok(ScanPage {
                    keys: vec![],
                    cursor: Some("1".to_string()),
                }),
                Some("1") => Ok(ScanPage {
                    keys: vec!["lead_a".to_string(), "lead_b".to_string()],
                    cursor: Some("2".to_string()),
                }),
                Some(_) => Err(StoreError::ConnectionFailed("reset".to_string())),
            }
        }

        async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_scan_keys_skips_empty_pages_and_stops_on_error() {
        let store = PagedStore;
        let items: Vec<StoreResult<String>> = scan_keys(&store, "lead_", 10).collect().await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap(), "lead_a");
        assert_eq!(items[1].as_ref().unwrap(), "lead_b");
        assert!(matches!(items[2], Err(StoreError::ConnectionFailed(_))));
    }
}
