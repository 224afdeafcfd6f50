use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Produces a value for a key that missed the cache.
///
/// Returning `None` leaves the cache untouched; failures are never cached.
#[async_trait]
pub trait CacheLoader<K, V>: Send + Sync {
    async fn load(&self, key: &K) -> Option<V>;
}

/// A cached value stamped with its insertion time on the runtime clock.
#[derive(Debug, Clone)]
pub(super) struct CacheEntry<V> {
    pub(super) value: V,
    pub(super) inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    pub(super) fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Expiry is measured from insertion only; reads never extend it.
    pub(super) fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}
