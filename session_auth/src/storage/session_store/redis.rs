use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

use crate::storage::errors::StorageError;

use super::types::{RedisSessionStore, SessionStore};

const SESSION_PREFIX: &str = "session";

impl RedisSessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn make_key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}:{session_id}")
    }

    // Redis rejects `EX 0`; sub-second TTLs round up to one second.
    fn ttl_secs(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn set(
        &self,
        session_id: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(session_id);
        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(value)
            .arg("EX")
            .arg(Self::ttl_secs(ttl))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn get(&self, session_id: &str) -> Result<String, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(session_id);
        let value: Option<String> = conn.get(&key).await?;

        value.ok_or(StorageError::NotFound)
    }

    #[tracing::instrument(skip_all)]
    async fn delete(&self, session_id: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(session_id);
        let _: () = conn.del(&key).await?;
        Ok(())
    }
}
