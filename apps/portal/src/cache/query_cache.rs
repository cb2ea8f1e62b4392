use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;
use tracing::debug;

use super::query_key::QueryKey;
use crate::error::ClientError;

type AnyValue = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
struct CachedEntry {
    value: AnyValue,
    fetched_at: Instant,
}

impl CachedEntry {
    fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            fetched_at: Instant::now(),
        }
    }

    fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        self.fetched_at.elapsed() < stale_time
    }
}

/// In-memory query results keyed by [`QueryKey`].
///
/// Each read decides its own staleness; entries are never refetched in the
/// background. Values are stored type-erased and read back by type, so a
/// read with the wrong type behaves like a miss.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<QueryKey, CachedEntry>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().max_capacity(1_024).build(),
        }
    }

    /// Cached value regardless of staleness.
    pub async fn get<T: Clone + Send + Sync + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.entries.get(key).await.and_then(|e| e.downcast::<T>())
    }

    pub async fn set<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        self.entries.insert(key, CachedEntry::new(value)).await;
    }

    /// Returns the cached value while it is younger than `stale_time`;
    /// otherwise runs `fetch` and caches its result. Errors are not cached.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        stale_time: Duration,
        fetch: F,
    ) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(entry) = self.entries.get(key).await {
            if entry.is_fresh(stale_time) {
                if let Some(value) = entry.downcast::<T>() {
                    debug!(key = %key, "query cache hit");
                    return Ok(value);
                }
            }
        }

        debug!(key = %key, "query cache miss");
        let value = fetch().await?;
        self.set(key.clone(), value.clone()).await;
        Ok(value)
    }

    /// Drops every entry whose key starts with `prefix`.
    pub async fn invalidate(&self, prefix: &QueryKey) {
        let doomed: Vec<QueryKey> = self
            .entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| (*k).clone())
            .collect();

        for key in &doomed {
            self.entries.invalidate(key).await;
        }
        debug!(prefix = %prefix, dropped = doomed.len(), "query cache invalidated");
    }

    /// Writes `updater(current)` before `mutation` completes. On success the
    /// key is invalidated so the next read refetches; on failure the previous
    /// entry is put back and the error is returned.
    pub async fn update_optimistically<T, U, M, R>(
        &self,
        key: &QueryKey,
        updater: U,
        mutation: M,
    ) -> Result<R, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        U: FnOnce(Option<T>) -> T,
        M: Future<Output = Result<R, ClientError>>,
    {
        let snapshot = self.entries.get(key).await;
        let previous = snapshot.as_ref().and_then(|e| e.downcast::<T>());
        self.set(key.clone(), updater(previous)).await;

        match mutation.await {
            Ok(result) => {
                self.invalidate(key).await;
                Ok(result)
            }
            Err(e) => {
                debug!(key = %key, error = %e, "optimistic update rolled back");
                match snapshot {
                    Some(entry) => self.entries.insert(key.clone(), entry).await,
                    None => self.entries.invalidate(key).await,
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn fresh_entries_skip_fetch() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["features"]);
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let v: u32 = cache
                .get_or_fetch(&key, Duration::from_secs(60), || async {
                    Ok(calls.fetch_add(1, Ordering::SeqCst) + 10)
                })
                .await
                .unwrap();
            assert_eq!(v, 10);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_stale_time_always_refetches() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["session"]);
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let _: u32 = cache
                .get_or_fetch(&key, Duration::ZERO, || async {
                    Ok(calls.fetch_add(1, Ordering::SeqCst))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["x"]);
        let res: Result<u8, _> = cache
            .get_or_fetch(&key, Duration::from_secs(60), || async {
                Err(ClientError::Http { status: 500 })
            })
            .await;
        assert!(res.is_err());
        assert!(cache.get::<u8>(&key).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_by_prefix() {
        let cache = QueryCache::new();
        let projects = QueryKey::new(["projects"]);
        cache.set(projects.child("list"), 1u8).await;
        cache.set(projects.child("detail").child("7"), 2u8).await;
        cache.set(QueryKey::new(["session"]), 3u8).await;

        cache.invalidate(&projects).await;

        assert!(cache.get::<u8>(&projects.child("list")).await.is_none());
        assert!(cache.get::<u8>(&projects.child("detail").child("7")).await.is_none());
        assert_eq!(cache.get::<u8>(&QueryKey::new(["session"])).await, Some(3));
    }

    #[tokio::test]
    async fn wrong_type_reads_as_miss() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["k"]);
        cache.set(key.clone(), "text".to_string()).await;
        assert!(cache.get::<u32>(&key).await.is_none());
    }

    #[tokio::test]
    async fn optimistic_update_rolls_back_on_failure() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["features"]);
        cache.set(key.clone(), vec![1u8]).await;

        let res: Result<(), _> = cache
            .update_optimistically(
                &key,
                |old: Option<Vec<u8>>| {
                    let mut v = old.unwrap_or_default();
                    v.push(2);
                    v
                },
                async { Err(ClientError::Http { status: 500 }) },
            )
            .await;

        assert!(res.is_err());
        assert_eq!(cache.get::<Vec<u8>>(&key).await, Some(vec![1]));
    }

    #[tokio::test]
    async fn optimistic_update_invalidates_on_success() {
        let cache = QueryCache::new();
        let key = QueryKey::new(["features"]);
        cache.set(key.clone(), vec![1u8]).await;

        let res = cache
            .update_optimistically(&key, |_: Option<Vec<u8>>| vec![9], async { Ok(5) })
            .await;

        assert_eq!(res.unwrap(), 5);
        assert!(cache.get::<Vec<u8>>(&key).await.is_none());
    }
}
