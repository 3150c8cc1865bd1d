//! Cache entry and statistics types

use std::time::{Duration, Instant};

/// A cached value stamped with its insertion time and TTL.
#[derive(Debug, Clone)]
pub struct CachedEntry<V> {
    pub value: V,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl<V> CachedEntry<V> {
    pub fn new(value: V, cached_at: Instant, ttl: Duration) -> Self {
        Self {
            value,
            cached_at,
            ttl,
        }
    }

    /// An entry is expired once its age reaches the TTL.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.cached_at) >= self.ttl
    }

    pub fn time_until_expiry(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.cached_at))
    }
}

/// Point-in-time counters for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub expired_evictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let start = Instant::now();
        let entry = CachedEntry::new(1, start, Duration::from_secs(10));
        assert!(!entry.is_expired(start + Duration::from_secs(9)));
        assert!(entry.is_expired(start + Duration::from_secs(10)));
        assert_eq!(
            entry.time_until_expiry(start + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
    }
}
