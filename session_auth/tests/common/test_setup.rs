use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use session_auth::{
    Account, AccountStore, AuthConfig, AuthService, InMemoryAccountStore, InMemorySessionStore,
    UserError,
};

/// Account store that counts lookups and can be slowed down.
pub struct CountingAccountStore {
    inner: InMemoryAccountStore,
    by_username: AtomicUsize,
    by_email: AtomicUsize,
    delay: Duration,
}

impl CountingAccountStore {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self::with_delay(accounts, Duration::ZERO)
    }

    pub fn with_delay(accounts: Vec<Account>, delay: Duration) -> Self {
        Self {
            inner: InMemoryAccountStore::with_accounts(accounts),
            by_username: AtomicUsize::new(0),
            by_email: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn username_lookups(&self) -> usize {
        self.by_username.load(Ordering::SeqCst)
    }

    pub fn email_lookups(&self) -> usize {
        self.by_email.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl AccountStore for CountingAccountStore {
    async fn get_by_username(&self, username: &str) -> Result<Account, UserError> {
        self.by_username.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.get_by_username(username).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Account, UserError> {
        self.by_email.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.get_by_email(email).await
    }

    async fn update(&self, account: &Account) -> Result<(), UserError> {
        self.inner.update(account).await
    }

    async fn create(&self, account: &Account) -> Result<(), UserError> {
        self.inner.create(account).await
    }

    async fn delete(&self, username: &str) -> Result<(), UserError> {
        self.inner.delete(username).await
    }

    async fn username_exists(&self, username: &str) -> Result<bool, UserError> {
        self.inner.username_exists(username).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserError> {
        self.inner.email_exists(email).await
    }

    async fn get_active_accounts(&self) -> Result<Vec<Account>, UserError> {
        self.inner.get_active_accounts().await
    }

    async fn get_all_accounts(&self) -> Result<Vec<Account>, UserError> {
        self.inner.get_all_accounts().await
    }
}

/// A service wired to in-memory stores, with handles on both stores.
pub struct TestEnv {
    pub service: Arc<AuthService>,
    pub accounts: Arc<CountingAccountStore>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestEnv {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self::with_store(CountingAccountStore::new(accounts))
    }

    pub fn with_store(store: CountingAccountStore) -> Self {
        let accounts = Arc::new(store);
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = Arc::new(AuthService::new(
            AuthConfig::default(),
            accounts.clone(),
            sessions.clone(),
        ));
        Self {
            service,
            accounts,
            sessions,
        }
    }

    /// Log `account` in and return the new session id.
    pub async fn login(&self, account: &Account) -> String {
        let mut ctx = session_auth::RequestContext::default();
        self.service
            .login_user(&mut ctx, account)
            .await
            .expect("login")
            .id
    }

    /// Flip the active flag of a stored account.
    pub async fn set_active(&self, username: &str, active: bool) {
        let mut account = self
            .accounts
            .get_by_username(username)
            .await
            .expect("account exists");
        account.is_active = active;
        self.accounts.update(&account).await.expect("update");
    }
}
