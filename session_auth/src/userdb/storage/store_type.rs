use async_trait::async_trait;

use crate::userdb::{errors::UserError, types::Account};

use super::postgres::*;
use super::sqlite::*;
use super::types::{AccountStore, SqlAccountStore, single_email_match};

impl SqlAccountStore {
    /// Create the accounts table if it does not exist yet.
    pub async fn init(&self) -> Result<(), UserError> {
        match self {
            Self::Sqlite(pool) => create_tables_sqlite(pool).await,
            Self::Postgres(pool) => create_tables_postgres(pool).await,
        }
    }
}

#[async_trait]
impl AccountStore for SqlAccountStore {
    #[tracing::instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> Result<Account, UserError> {
        let result = match self {
            Self::Sqlite(pool) => get_account_by_username_sqlite(pool, username).await,
            Self::Postgres(pool) => get_account_by_username_postgres(pool, username).await,
        };

        match &result {
            Ok(_) => tracing::debug!(found = true, "Account lookup completed"),
            Err(UserError::NotFound) => {
                tracing::debug!(found = false, "Account lookup completed - not found")
            }
            Err(e) => tracing::error!(error = %e, "Account lookup failed"),
        }

        result
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> Result<Account, UserError> {
        let accounts = match self {
            Self::Sqlite(pool) => get_accounts_by_email_sqlite(pool, email).await?,
            Self::Postgres(pool) => get_accounts_by_email_postgres(pool, email).await?,
        };
        single_email_match(email, accounts)
    }

    #[tracing::instrument(skip(self, account), fields(username = %account.username))]
    async fn update(&self, account: &Account) -> Result<(), UserError> {
        match self {
            Self::Sqlite(pool) => update_account_sqlite(pool, account).await,
            Self::Postgres(pool) => update_account_postgres(pool, account).await,
        }
    }

    #[tracing::instrument(skip(self, account), fields(username = %account.username))]
    async fn create(&self, account: &Account) -> Result<(), UserError> {
        let result = match self {
            Self::Sqlite(pool) => insert_account_sqlite(pool, account).await,
            Self::Postgres(pool) => insert_account_postgres(pool, account).await,
        };

        match &result {
            Ok(()) => tracing::info!("Account created"),
            Err(e) => tracing::error!(error = %e, "Account creation failed"),
        }

        result
    }

    async fn delete(&self, username: &str) -> Result<(), UserError> {
        match self {
            Self::Sqlite(pool) => delete_account_sqlite(pool, username).await,
            Self::Postgres(pool) => delete_account_postgres(pool, username).await,
        }
    }

    async fn username_exists(&self, username: &str) -> Result<bool, UserError> {
        let count = match self {
            Self::Sqlite(pool) => count_by_username_sqlite(pool, username).await?,
            Self::Postgres(pool) => count_by_username_postgres(pool, username).await?,
        };
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserError> {
        let count = match self {
            Self::Sqlite(pool) => count_by_email_sqlite(pool, email).await?,
            Self::Postgres(pool) => count_by_email_postgres(pool, email).await?,
        };
        Ok(count > 0)
    }

    async fn get_active_accounts(&self) -> Result<Vec<Account>, UserError> {
        match self {
            Self::Sqlite(pool) => get_accounts_sqlite(pool, true).await,
            Self::Postgres(pool) => get_accounts_postgres(pool, true).await,
        }
    }

    async fn get_all_accounts(&self) -> Result<Vec<Account>, UserError> {
        match self {
            Self::Sqlite(pool) => get_accounts_sqlite(pool, false).await,
            Self::Postgres(pool) => get_accounts_postgres(pool, false).await,
        }
    }
}
