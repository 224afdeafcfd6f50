use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::userdb::{errors::UserError, types::Account};

use super::types::{AccountStore, InMemoryAccountStore, single_email_match};

impl InMemoryAccountStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory account store");
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store pre-populated with `accounts`.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: RwLock::new(
                accounts
                    .into_iter()
                    .map(|a| (a.username.clone(), a))
                    .collect(),
            ),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_by_username(&self, username: &str) -> Result<Account, UserError> {
        self.accounts
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(UserError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<Account, UserError> {
        let matches = self
            .accounts
            .read()
            .await
            .values()
            .filter(|a| a.email.eq_ignore_ascii_case(email))
            .cloned()
            .collect();
        single_email_match(email, matches)
    }

    async fn update(&self, account: &Account) -> Result<(), UserError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account.username) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(UserError::NotFound),
        }
    }

    async fn create(&self, account: &Account) -> Result<(), UserError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Err(UserError::Conflict(format!(
                "username {} is taken",
                account.username
            )));
        }
        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(UserError::Conflict(format!(
                "email {} is taken",
                account.email
            )));
        }
        accounts.insert(account.username.clone(), account.clone());
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<(), UserError> {
        self.accounts.write().await.remove(username);
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, UserError> {
        Ok(self.accounts.read().await.contains_key(username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(email)))
    }

    async fn get_active_accounts(&self) -> Result<Vec<Account>, UserError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .read()
            .await
            .values()
            .filter(|a| a.is_active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }

    async fn get_all_accounts(&self) -> Result<Vec<Account>, UserError> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(accounts)
    }
}
