//! Freshness-window cache in front of any gateway.
//!
//! A successful result is reused for an identical [`FetchKey`] until it is
//! older than the TTL. Failures are never cached.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::BoxFuture;
use crate::model::DomainNode;
use crate::navigation::FetchKey;

use super::fetch::{FetchError, TreeFetchGateway};

struct CacheEntry {
    fetched_at: Instant,
    tree: Option<DomainNode>,
}

/// TTL cache keyed by fetch key.
pub struct CachedGateway<G> {
    inner: G,
    ttl: Duration,
    entries: Mutex<HashMap<FetchKey, CacheEntry>>,
}

impl<G: TreeFetchGateway> CachedGateway<G> {
    pub fn new(inner: G, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached keys, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &FetchKey) -> Option<Option<DomainNode>> {
        let mut entries = self.entries.lock().ok()?;
        let fresh = entries
            .get(key)
            .map(|entry| entry.fetched_at.elapsed() < self.ttl)?;
        if fresh {
            entries.get(key).map(|entry| entry.tree.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    /// Insert `tree`, evicting every expired entry first.
    fn store(&self, key: FetchKey, tree: Option<DomainNode>) {
        if let Ok(mut entries) = self.entries.lock() {
            let before = entries.len();
            entries.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
            let evicted = before - entries.len();
            if evicted > 0 {
                debug!(evicted, "Evicted expired tree cache entries");
            }
            entries.insert(
                key,
                CacheEntry {
                    fetched_at: Instant::now(),
                    tree,
                },
            );
        }
    }
}

impl<G: TreeFetchGateway> TreeFetchGateway for CachedGateway<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Drop every cached entry, then invalidate the inner gateway.
    fn invalidate(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            debug!(entries = entries.len(), "Tree cache invalidated");
            entries.clear();
        }
        self.inner.invalidate();
    }

    fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>> {
        if let Some(tree) = self.lookup(key) {
            debug!(%key, "Tree cache hit");
            return Box::pin(async move { Ok(tree) });
        }

        let key = key.clone();
        Box::pin(async move {
            let result = self.inner.fetch(&key).await;
            if let Ok(tree) = &result {
                self.store(key, tree.clone());
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails every other one when `flaky` is set.
    struct CountingGateway {
        calls: AtomicUsize,
        flaky: bool,
    }

    impl CountingGateway {
        fn new(flaky: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                flaky,
            }
        }
    }

    impl TreeFetchGateway for CountingGateway {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.flaky && n % 2 == 0 {
                Err(FetchError::Timeout)
            } else {
                Ok(Some(DomainNode::new(
                    key.root_id.clone().unwrap_or_else(|| "ROOT".to_string()),
                    format!("call {n}"),
                )))
            };
            Box::pin(async move { result })
        }
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_is_cached() {
        let cache = CachedGateway::new(CountingGateway::new(false), Duration::from_secs(60));
        let key = FetchKey::viewer(3);

        let first = cache.fetch(&key).await.unwrap();
        let second = cache.fetch(&key).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.name(), "counting");
    }

    #[tokio::test]
    async fn test_distinct_keys_are_fetched_separately() {
        let cache = CachedGateway::new(CountingGateway::new(false), Duration::from_secs(60));
        cache.fetch(&FetchKey::viewer(3)).await.unwrap();
        cache.fetch(&FetchKey::viewer(4)).await.unwrap();
        cache
            .fetch(&FetchKey::new(Some("M002".to_string()), 3))
            .await
            .unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache = CachedGateway::new(CountingGateway::new(false), Duration::from_millis(20));
        let key = FetchKey::viewer(3);
        cache.fetch(&key).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        cache.fetch(&key).await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = CachedGateway::new(CountingGateway::new(true), Duration::from_secs(60));
        let key = FetchKey::viewer(3);
        assert_eq!(cache.fetch(&key).await, Err(FetchError::Timeout));
        assert!(cache.is_empty());
        assert!(cache.fetch(&key).await.is_ok());
        assert!(cache.fetch(&key).await.is_ok());
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_clears_entries() {
        let cache = CachedGateway::new(CountingGateway::new(false), Duration::from_secs(60));
        let key = FetchKey::viewer(3);
        cache.fetch(&key).await.unwrap();
        cache.invalidate();
        cache.fetch(&key).await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_through_trait_object() {
        let cache: Box<dyn TreeFetchGateway> = Box::new(CachedGateway::new(
            CountingGateway::new(false),
            Duration::from_secs(60),
        ));
        let key = FetchKey::viewer(3);
        let first = cache.fetch(&key).await.unwrap();
        cache.invalidate();
        let second = cache.fetch(&key).await.unwrap();
        // A cached hit would repeat "call 0".
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_store_evicts_expired_entries() {
        let cache = CachedGateway::new(CountingGateway::new(false), Duration::from_millis(200));
        for depth in 1..=200 {
            cache.fetch(&FetchKey::viewer(depth)).await.unwrap();
        }
        assert_eq!(cache.len(), 200);

        tokio::time::sleep(Duration::from_millis(250)).await;
        cache.fetch(&FetchKey::viewer(201)).await.unwrap();
        assert_eq!(cache.len(), 1);
    }
}
