use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::storage::errors::StorageError;

/// In-process session store. Honors per-key expiration lazily on read.
pub struct InMemorySessionStore {
    pub(super) entry: Mutex<HashMap<String, StoredValue>>,
}

pub(super) struct StoredValue {
    pub(super) value: String,
    pub(super) expires_at: Instant,
}

/// Session store backed by Redis keys with native expiration.
pub struct RedisSessionStore {
    pub(super) client: redis::Client,
}

/// Durable mapping from an opaque session identifier to the owning username.
///
/// `get` must report [`StorageError::NotFound`] for absent or expired keys so
/// callers can tell an invalid session apart from an unavailable store.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Verify the backing store is reachable.
    async fn init(&self) -> Result<(), StorageError>;

    /// Store `value` under `session_id`, expiring after `ttl`.
    async fn set(&self, session_id: &str, value: &str, ttl: Duration)
    -> Result<(), StorageError>;

    /// Fetch the value stored under `session_id`.
    async fn get(&self, session_id: &str) -> Result<String, StorageError>;

    /// Remove `session_id`. Removing an absent key is not an error.
    async fn delete(&self, session_id: &str) -> Result<(), StorageError>;
}
