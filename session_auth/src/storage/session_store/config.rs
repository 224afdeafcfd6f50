use std::env;
use std::sync::Arc;

use crate::storage::errors::StorageError;

use super::types::{InMemorySessionStore, RedisSessionStore, SessionStore};

/// Builds the session store named by `SESSION_STORE_TYPE` (`memory` or `redis`)
/// using `SESSION_STORE_URL` for the redis connection string.
pub async fn session_store_from_env() -> Result<Arc<dyn SessionStore>, StorageError> {
    let store_type = env::var("SESSION_STORE_TYPE").unwrap_or_else(|_| "memory".to_string());
    let store_url = env::var("SESSION_STORE_URL").unwrap_or_default();
    create_session_store(&store_type, &store_url).await
}

/// Creates and verifies a session store of the given type.
pub async fn create_session_store(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn SessionStore>, StorageError> {
    tracing::info!(
        "Initializing session store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store: Arc<dyn SessionStore> = match store_type {
        "memory" => Arc::new(InMemorySessionStore::new()),
        "redis" => {
            let client = redis::Client::open(store_url).map_err(|e| {
                tracing::error!("Failed to create Redis client: {}", e);
                StorageError::Config(format!("Invalid redis url: {e}"))
            })?;
            Arc::new(RedisSessionStore::new(client))
        }
        t => {
            return Err(StorageError::Config(format!(
                "Unsupported session store type: {t}. Supported types are 'memory' and 'redis'"
            )));
        }
    };

    store.init().await.inspect_err(|e| {
        tracing::error!("Failed to connect to session store: {}", e);
    })?;

    tracing::info!("Connected to session store: type={}", store_type);
    Ok(store)
}
