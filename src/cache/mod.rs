//! Short-lived in-memory cache for immutable upstream resources
//!
//! Only resources that can never change once published (finished match details)
//! belong here. Mastery, rank and live-game data bypass the cache entirely.
//! Expired entries are dropped lazily on lookup; there is no background sweep.

pub mod clock;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{CacheStats, CachedEntry};

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

use crate::models::MatchDetail;

/// Cache of finished match details keyed by match id.
pub type MatchCache = EphemeralCache<MatchDetail>;

/// LRU-bounded key/value store with per-entry TTL and an injected clock.
///
/// Writers for the same key always carry the same immutable value, so
/// concurrent `put`s are last-write-wins without coordination.
#[derive(Debug)]
pub struct EphemeralCache<V> {
    entries: RwLock<LruCache<String, CachedEntry<V>>>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    expired_evictions: AtomicU64,
}

impl<V: Clone> EphemeralCache<V> {
    pub fn new(capacity: usize, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            clock,
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired_evictions: AtomicU64::new(0),
        }
    }

    /// Cache backed by the system clock
    pub fn with_system_clock(capacity: usize, default_ttl: Duration) -> Self {
        Self::new(capacity, default_ttl, Arc::new(SystemClock))
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the value if present and fresh. An expired entry is removed and reported as a miss.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                trace!(
                    "Cache hit: key={}, expires_in={:?}",
                    key,
                    entry.time_until_expiry(now)
                );
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Removing expired cache entry: key={key}");
                entries.pop(key);
                self.expired_evictions.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                trace!("Cache miss: key={key}");
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    #[instrument(skip(self, value))]
    pub async fn put(&self, key: &str, value: V, ttl: Duration) {
        let entry = CachedEntry::new(value, self.clock.now(), ttl);
        self.entries.write().await.put(key.to_string(), entry);
        debug!("Cached entry with ttl={:?}", ttl);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        CacheStats {
            size: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired_evictions: self.expired_evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_clock(capacity: usize) -> (EphemeralCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = EphemeralCache::new(capacity, Duration::from_secs(300), clock.clone());
        (cache, clock)
    }

    #[tokio::test]
    async fn test_put_then_get_returns_value() {
        let (cache, _clock) = cache_with_clock(10);
        cache
            .put("LA1_1", "match".to_string(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("LA1_1").await, Some("match".to_string()));
    }

    #[tokio::test]
    async fn test_get_after_ttl_is_a_miss_and_evicts() {
        let (cache, clock) = cache_with_clock(10);
        cache
            .put("LA1_1", "match".to_string(), Duration::from_secs(60))
            .await;

        clock.advance(Duration::from_secs(59));
        assert!(cache.get("LA1_1").await.is_some());

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("LA1_1").await, None);
        assert_eq!(cache.len().await, 0);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expired_evictions, 1);
    }

    #[tokio::test]
    async fn test_rewriting_a_key_refreshes_it() {
        let (cache, clock) = cache_with_clock(10);
        cache.put("k", "v".to_string(), Duration::from_secs(10)).await;
        clock.advance(Duration::from_secs(8));
        cache.put("k", "v".to_string(), Duration::from_secs(10)).await;
        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get("k").await, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let (cache, _clock) = cache_with_clock(2);
        cache.put("a", "1".to_string(), Duration::from_secs(60)).await;
        cache.put("b", "2".to_string(), Duration::from_secs(60)).await;
        assert!(cache.get("a").await.is_some());
        cache.put("c", "3".to_string(), Duration::from_secs(60)).await;

        assert!(cache.get("b").await.is_none());
        assert!(cache.get("a").await.is_some());
        assert!(cache.get("c").await.is_some());
        assert_eq!(cache.stats().await.capacity, 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let (cache, _clock) = cache_with_clock(0);
        cache.put("a", "1".to_string(), Duration::from_secs(60)).await;
        assert_eq!(cache.len().await, 1);
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
