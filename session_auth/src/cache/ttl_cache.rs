use moka::future::Cache;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::types::{CacheEntry, CacheLoader};

/// Upper bound on how long the backing cache retains an entry
const MAX_RETENTION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// In-process cache with a fixed per-entry TTL, backed by `moka`.
///
/// Hits never extend an entry's lifetime, so a cached value is at most one
/// TTL old regardless of how often it is read. Freshness is judged on the
/// tokio clock; moka's own `time_to_live` reclaims the memory.
///
/// When a [`CacheLoader`] is registered, [`TtlCache::get_or_load`] collapses
/// concurrent misses for one key into a single load whose result every
/// waiting caller observes.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Cache<K, CacheEntry<V>>,
    loader: Option<Arc<dyn CacheLoader<K, V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// A cache populated only through explicit inserts.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Cache::builder()
                .time_to_live(ttl.min(MAX_RETENTION))
                .build(),
            loader: None,
        }
    }

    /// A cache that fills misses from `loader`.
    pub fn with_loader(ttl: Duration, loader: Arc<dyn CacheLoader<K, V>>) -> Self {
        Self {
            loader: Some(loader),
            ..Self::new(ttl)
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    /// Returns the live value for `key` without consulting the loader.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key).await?;
        if entry.is_expired(self.ttl, Instant::now()) {
            self.entries.invalidate(key).await;
            return None;
        }
        Some(entry.value)
    }

    /// Returns the live value for `key`, loading it on a miss.
    ///
    /// Only one load per key runs at a time. If the loading caller is
    /// cancelled, a waiting caller takes over the load, and nothing is stored
    /// unless a load completes with a value.
    pub async fn get_or_load(&self, key: &K) -> Option<V> {
        if let Some(value) = self.get(key).await {
            return Some(value);
        }
        let loader = self.loader.as_ref()?;

        self.entries
            .optionally_get_with(key.clone(), async {
                loader.load(key).await.map(CacheEntry::new)
            })
            .await
            .map(|entry| entry.value)
    }

    /// Inserts `value`, replacing any entry and restarting its TTL.
    pub async fn insert(&self, key: K, value: V) {
        self.entries.insert(key, CacheEntry::new(value)).await;
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.invalidate(key).await;
    }

    pub async fn invalidate_all(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<Arc<K>> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl, now))
            .map(|(key, _)| key)
            .collect();

        for key in &expired {
            self.entries.invalidate(key.as_ref()).await;
        }
        self.entries.run_pending_tasks().await;
        expired.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
