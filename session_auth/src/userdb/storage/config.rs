use std::{env, str::FromStr, sync::Arc, sync::LazyLock};

use crate::userdb::errors::UserError;

use super::types::{AccountStore, InMemoryAccountStore, SqlAccountStore};

/// Accounts table name
pub(super) static DB_TABLE_USERS: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_USERS").unwrap_or_else(|_| "users".to_string()));

/// Builds the account store named by `ACCOUNT_STORE_TYPE` (`memory`, `sqlite`
/// or `postgres`) using `ACCOUNT_STORE_URL` as the connection string.
pub async fn account_store_from_env() -> Result<Arc<dyn AccountStore>, UserError> {
    let store_type = env::var("ACCOUNT_STORE_TYPE").unwrap_or_else(|_| "memory".to_string());
    let store_url = env::var("ACCOUNT_STORE_URL").unwrap_or_default();
    create_account_store(&store_type, &store_url).await
}

pub async fn create_account_store(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn AccountStore>, UserError> {
    tracing::info!(
        "Initializing account store with type: {}, table: {}",
        store_type,
        DB_TABLE_USERS.as_str()
    );

    let store: Arc<dyn AccountStore> = match store_type {
        "memory" => Arc::new(InMemoryAccountStore::new()),
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .map_err(|e| UserError::Storage(format!("Invalid SQLite url: {e}")))?
                .create_if_missing(true);
            let store = SqlAccountStore::Sqlite(sqlx::SqlitePool::connect_lazy_with(opts));
            store.init().await?;
            Arc::new(store)
        }
        "postgres" => {
            let pool = sqlx::PgPool::connect_lazy(store_url)
                .map_err(|e| UserError::Storage(format!("Invalid Postgres url: {e}")))?;
            let store = SqlAccountStore::Postgres(pool);
            store.init().await?;
            Arc::new(store)
        }
        t => {
            return Err(UserError::Storage(format!(
                "Unsupported account store type: {t}. Supported types are 'memory', 'sqlite' and 'postgres'"
            )));
        }
    };

    tracing::info!("Connected to account store: type={}", store_type);
    Ok(store)
}
