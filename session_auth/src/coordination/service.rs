use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::{CacheLoader, TtlCache};
use crate::config::AuthConfig;
use crate::session::{SessionError, SessionManager, User};
use crate::storage::{SessionStore, session_store_from_env};
use crate::userdb::{AccountStore, UserError, account_store_from_env};

use super::errors::AuthError;

/// Resolves request identities and drives the login/logout lifecycle.
///
/// Owns the two identity caches; construct one per process and share it.
pub struct AuthService {
    pub(super) config: AuthConfig,
    pub(super) accounts: Arc<dyn AccountStore>,
    pub(super) sessions: SessionManager,
    /// username -> identity, filled by [`AccountLoader`] on a miss
    pub(super) identity_cache: TtlCache<String, User>,
    /// raw Authorization header -> identity, filled after verification
    pub(super) credential_cache: TtlCache<String, User>,
}

/// Loads identities for the identity cache. Missing, inactive or
/// unreadable accounts produce no value.
struct AccountLoader {
    accounts: Arc<dyn AccountStore>,
}

#[async_trait]
impl CacheLoader<String, User> for AccountLoader {
    async fn load(&self, username: &String) -> Option<User> {
        match self.accounts.get_by_username(username).await {
            Ok(account) if account.is_active => Some(User::from(&account)),
            Ok(_) => {
                tracing::debug!(username = %username, "Session owner is inactive");
                None
            }
            Err(UserError::NotFound) => {
                tracing::debug!(username = %username, "Session owner no longer exists");
                None
            }
            Err(e) => {
                tracing::warn!(username = %username, "Failed to load session owner: {}", e);
                None
            }
        }
    }
}

impl AuthService {
    pub fn new(
        config: AuthConfig,
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let loader = Arc::new(AccountLoader {
            accounts: accounts.clone(),
        });

        Self {
            identity_cache: TtlCache::with_loader(config.identity_cache_ttl, loader),
            credential_cache: TtlCache::new(config.credential_cache_ttl),
            sessions: SessionManager::new(
                sessions,
                config.session_cookie_name.clone(),
                config.session_ttl,
            ),
            accounts,
            config,
        }
    }

    /// Builds the service from `AuthConfig::from_env` and the store
    /// selection variables, initializing both stores.
    pub async fn from_env() -> Result<Self, AuthError> {
        let config = AuthConfig::from_env();
        let sessions = session_store_from_env()
            .await
            .map_err(SessionError::Storage)?;
        let accounts = account_store_from_env().await?;
        tracing::info!(
            cookie = %config.session_cookie_name,
            session_ttl_secs = config.session_ttl.as_secs(),
            "Authentication service configured"
        );
        Ok(Self::new(config, accounts, sessions))
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    pub fn session_cookie_name(&self) -> &str {
        self.sessions.cookie_name()
    }

    /// Drop the cached identity of `username` so the next request reloads it.
    ///
    /// Login and logout leave the identity cache alone; callers that mutate
    /// accounts use this to make the change visible before the entry expires.
    pub async fn invalidate_identity(&self, username: &str) {
        self.identity_cache
            .invalidate(&username.to_string())
            .await;
        tracing::debug!(username = %username, "Evicted cached identity");
    }

    /// Drop every cached identity, both session- and credential-derived.
    pub async fn clear_caches(&self) {
        self.identity_cache.invalidate_all().await;
        self.credential_cache.invalidate_all().await;
    }

    /// Sweep expired entries out of both caches.
    pub async fn purge_expired(&self) -> usize {
        self.identity_cache.purge_expired().await + self.credential_cache.purge_expired().await
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
