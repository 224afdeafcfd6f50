use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::userdb::{errors::UserError, types::Account};

/// Accounts held in process memory, keyed by username.
pub struct InMemoryAccountStore {
    pub(super) accounts: RwLock<HashMap<String, Account>>,
}

/// Accounts persisted in SQLite or PostgreSQL through sqlx.
#[derive(Clone, Debug)]
pub enum SqlAccountStore {
    Sqlite(sqlx::SqlitePool),
    Postgres(sqlx::PgPool),
}

/// Durable account repository.
///
/// Lookups report [`UserError::NotFound`] when no account matches.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    async fn get_by_username(&self, username: &str) -> Result<Account, UserError>;

    /// Case-insensitive email lookup. More than one match is
    /// [`UserError::Ambiguous`].
    async fn get_by_email(&self, email: &str) -> Result<Account, UserError>;

    /// Overwrite the stored record whose username matches `account.username`.
    async fn update(&self, account: &Account) -> Result<(), UserError>;

    /// Insert a new account. An existing username or email is
    /// [`UserError::Conflict`].
    async fn create(&self, account: &Account) -> Result<(), UserError>;

    async fn delete(&self, username: &str) -> Result<(), UserError>;

    async fn username_exists(&self, username: &str) -> Result<bool, UserError>;

    async fn email_exists(&self, email: &str) -> Result<bool, UserError>;

    async fn get_active_accounts(&self) -> Result<Vec<Account>, UserError>;

    async fn get_all_accounts(&self) -> Result<Vec<Account>, UserError>;
}

/// Row shape shared by the SQL back-ends; the profile is stored as JSON text.
#[derive(Debug, FromRow)]
pub(super) struct AccountRow {
    pub(super) username: String,
    pub(super) email: String,
    pub(super) password: String,
    pub(super) first_name: String,
    pub(super) last_name: String,
    pub(super) is_superuser: bool,
    pub(super) is_active: bool,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) confirmed_at: Option<DateTime<Utc>>,
    pub(super) last_login_at: Option<DateTime<Utc>>,
    pub(super) profile: Option<String>,
}

impl TryFrom<AccountRow> for Account {
    type Error = UserError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let profile = row
            .profile
            .filter(|p| !p.is_empty())
            .map(|p| serde_json::from_str(&p))
            .transpose()?;

        Ok(Self {
            username: row.username,
            email: row.email,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            is_superuser: row.is_superuser,
            is_active: row.is_active,
            created_at: row.created_at,
            confirmed_at: row.confirmed_at,
            last_login_at: row.last_login_at,
            profile,
        })
    }
}

pub(super) fn profile_to_text(account: &Account) -> Result<Option<String>, UserError> {
    account
        .profile
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(UserError::from)
}

/// Collapse an email query result to the single expected account.
pub(super) fn single_email_match(
    email: &str,
    mut accounts: Vec<Account>,
) -> Result<Account, UserError> {
    match accounts.len() {
        0 => Err(UserError::NotFound),
        1 => Ok(accounts.remove(0)),
        n => Err(UserError::Ambiguous(format!(
            "{n} accounts with email address {email}"
        ))),
    }
}
