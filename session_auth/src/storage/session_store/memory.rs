use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::storage::errors::StorageError;

use super::types::{InMemorySessionStore, SessionStore, StoredValue};

const SESSION_PREFIX: &str = "session";

/// Stand-in expiry for TTLs too large to represent
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}:{session_id}")
    }

    /// Number of stored keys, expired or not.
    pub async fn len(&self) -> usize {
        self.entry.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn set(
        &self,
        session_id: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StorageError> {
        let key = Self::make_key(session_id);
        let now = Instant::now();
        let stored = StoredValue {
            value: value.to_string(),
            expires_at: now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE),
        };

        let mut entry = self.entry.lock().await;
        // Expired sessions are swept on every write
        entry.retain(|_, stored| stored.expires_at > now);
        entry.insert(key, stored);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<String, StorageError> {
        let key = Self::make_key(session_id);
        let mut entry = self.entry.lock().await;

        match entry.get(&key) {
            Some(stored) if stored.expires_at > Instant::now() => Ok(stored.value.clone()),
            Some(_) => {
                entry.remove(&key);
                Err(StorageError::NotFound)
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<(), StorageError> {
        let key = Self::make_key(session_id);
        self.entry.lock().await.remove(&key);
        Ok(())
    }
}
