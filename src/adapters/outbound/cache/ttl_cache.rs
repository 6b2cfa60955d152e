use crate::ports::outbound::{Clock, KeyValueStore};
use crate::shared::Result;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix every cache key is stored under
pub const DEFAULT_CACHE_PREFIX: &str = "scope-graph/";

/// Default lifetime of a cache entry (one day)
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Stored form of a cached value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Timestamp-only view of a stored entry, used when sweeping
#[derive(Deserialize)]
struct EntryStamp {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
}

/// Result of looking a key up
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    /// A fresh entry exists
    Hit(T),
    /// Nothing usable is stored; the caller has to compute the value
    Miss,
}

/// TtlCache memoizes asynchronous computations behind string keys
///
/// Entries live in a [`KeyValueStore`] under a fixed prefix and are valid while
/// `now - timestamp < ttl`. Expired or undecodable entries are purged on
/// lookup.
///
/// There is no single-flight lock: two concurrent misses on the same key
/// both run their computation and the later write wins.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    prefix: String,
    ttl: Duration,
}

impl TtlCache {
    /// Creates a cache with the default prefix and a 24 hour lifetime
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            prefix: DEFAULT_CACHE_PREFIX.to_string(),
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Looks a key up, purging it when expired or undecodable
    ///
    /// # Errors
    /// Returns an error if the underlying store fails
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<CacheLookup<T>> {
        let storage_key = self.storage_key(key);

        let Some(raw) = self.store.get(&storage_key)? else {
            return Ok(CacheLookup::Miss);
        };

        let entry: CacheEntry<T> = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %storage_key, error = %e, "discarding undecodable cache entry");
                self.store.delete(&storage_key)?;
                return Ok(CacheLookup::Miss);
            }
        };

        if self.clock.now() - entry.timestamp < self.ttl {
            Ok(CacheLookup::Hit(entry.data))
        } else {
            debug!(key = %storage_key, "cache entry expired");
            self.store.delete(&storage_key)?;
            Ok(CacheLookup::Miss)
        }
    }

    /// Stores `data` under `key`, stamped with the current time
    ///
    /// # Errors
    /// Returns an error if the value cannot be serialized or the store fails
    pub fn store<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now(),
        };
        self.store
            .set(&self.storage_key(key), serde_json::to_value(&entry)?)
    }

    /// Returns the cached value for `key`, or runs `compute` and caches its result
    ///
    /// `compute` runs at most once per call. When it fails nothing is stored
    /// and its error is returned unchanged.
    ///
    /// # Errors
    /// Returns the error of `compute`, or of the store when reading fails
    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        if let CacheLookup::Hit(data) = self.lookup(key)? {
            debug!(key, "cache hit");
            return Ok(data);
        }

        debug!(key, "cache miss");
        let data = compute().await?;

        if let Err(e) = self.store(key, &data) {
            warn!(key, error = %e, "failed to persist cache entry");
        }

        Ok(data)
    }

    /// Removes every expired or undecodable entry under this cache's prefix
    ///
    /// Lookups only purge the key they read, and download keys embed the
    /// date range, so stale keys are never read again without this sweep.
    ///
    /// # Returns
    /// The number of removed entries
    pub fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut removed = 0;

        for key in self.store.keys_with_prefix(&self.prefix)? {
            let fresh = match self.store.get(&key)? {
                Some(raw) => serde_json::from_value::<EntryStamp>(raw)
                    .is_ok_and(|entry| now - entry.timestamp < self.ttl),
                None => continue,
            };
            if !fresh {
                self.store.delete(&key)?;
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed, "purged expired cache entries");
        }
        Ok(removed)
    }

    /// Removes every entry under this cache's prefix
    ///
    /// # Returns
    /// The number of removed entries
    pub fn clear_all(&self) -> Result<usize> {
        let keys = self.store.keys_with_prefix(&self.prefix)?;
        for key in &keys {
            self.store.delete(key)?;
        }
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::MemoryKeyValueStore;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Clock whose time only moves when told to
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap()),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn setup() -> (TtlCache, Arc<ManualClock>, MemoryKeyValueStore) {
        let store = MemoryKeyValueStore::new();
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::new(Arc::new(store.clone()), clock.clone());
        (cache, clock, store)
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_cached() {
        let (cache, clock, _) = setup();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..2 {
            let value: u64 = cache
                .get_or_compute("k", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
            clock.advance(Duration::hours(23));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recomputes_after_ttl() {
        let (cache, clock, _) = setup();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let compute = move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("value-{}", n))
        };

        let first: String = cache.get_or_compute("k", compute).await.unwrap();
        clock.advance(Duration::hours(24));
        let second: String = cache.get_or_compute("k", compute).await.unwrap();

        assert_eq!(first, "value-0");
        assert_eq!(second, "value-1");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_compute_stores_nothing() {
        let (cache, _, store) = setup();

        let result: Result<u64> = cache
            .get_or_compute("k", || async { Err(anyhow::anyhow!("registry down")) })
            .await;

        assert_eq!(result.unwrap_err().to_string(), "registry down");
        assert!(store.is_empty());
        assert_eq!(cache.lookup::<u64>("k").unwrap(), CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_keys_are_namespaced() {
        let (cache, _, store) = setup();

        let _: u64 = cache.get_or_compute("info", || async { Ok(1) }).await.unwrap();

        assert!(store.get("scope-graph/info").unwrap().is_some());
        assert!(store.get("info").unwrap().is_none());
    }

    #[test]
    fn test_expired_entry_is_purged() {
        let (cache, clock, store) = setup();
        cache.store("k", &"stale").unwrap();

        clock.advance(Duration::hours(25));

        assert_eq!(cache.lookup::<String>("k").unwrap(), CacheLookup::Miss);
        assert!(store.get("scope-graph/k").unwrap().is_none());
    }

    #[test]
    fn test_undecodable_entry_is_a_miss() {
        let (cache, _, store) = setup();
        store
            .set("scope-graph/k", serde_json::json!({ "unexpected": true }))
            .unwrap();

        assert_eq!(cache.lookup::<u64>("k").unwrap(), CacheLookup::Miss);
        assert!(store.is_empty());
    }

    #[test]
    fn test_entry_layout() {
        let (cache, _, store) = setup();
        cache.store("k", &vec![1, 2, 3]).unwrap();

        let raw = store.get("scope-graph/k").unwrap().unwrap();
        assert_eq!(raw["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(raw["timestamp"], serde_json::json!(1736164800000i64));
    }

    #[test]
    fn test_clear_all_only_touches_prefix() {
        let (cache, _, store) = setup();
        cache.store("a", &1).unwrap();
        cache.store("b", &2).unwrap();
        store.set("other-app/c", serde_json::json!(3)).unwrap();

        let removed = cache.clear_all().unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("other-app/c").unwrap().is_some());
    }

    #[test]
    fn test_custom_ttl() {
        let (cache, clock, _) = setup();
        let cache = cache.with_ttl(Duration::minutes(5));
        cache.store("k", &7u8).unwrap();

        clock.advance(Duration::minutes(4));
        assert_eq!(cache.lookup::<u8>("k").unwrap(), CacheLookup::Hit(7));

        clock.advance(Duration::minutes(1));
        assert_eq!(cache.lookup::<u8>("k").unwrap(), CacheLookup::Miss);
    }

    #[test]
    fn test_purge_expired_sweeps_keys_never_read_again() {
        let (cache, clock, store) = setup();
        for day in 0..30 {
            clock.advance(Duration::days(1));
            cache
                .store(&format!("downloads/@s/a/day-{}", day), &day)
                .unwrap();
        }
        store.set("other-app/k", serde_json::json!(1)).unwrap();

        // Only the entry written in the last 24 hours survives
        let removed = cache.purge_expired().unwrap();

        assert_eq!(removed, 29);
        assert_eq!(
            store.keys_with_prefix("scope-graph/").unwrap(),
            vec!["scope-graph/downloads/@s/a/day-29".to_string()]
        );
        assert!(store.get("other-app/k").unwrap().is_some());
    }

    #[test]
    fn test_purge_expired_drops_undecodable_entries() {
        let (cache, _, store) = setup();
        cache.store("fresh", &1).unwrap();
        store.set("scope-graph/broken", serde_json::json!("no stamp")).unwrap();

        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert_eq!(cache.lookup::<i32>("fresh").unwrap(), CacheLookup::Hit(1));
    }
}
