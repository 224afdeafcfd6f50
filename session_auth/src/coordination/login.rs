use chrono::Utc;
use std::time::Duration;

use crate::session::{RequestContext, SessionInfo, User};
use crate::userdb::{Account, UserError};

use super::errors::AuthError;
use super::service::AuthService;

/// A login identifier containing `@` is an email address.
pub(super) fn is_email_login(login: &str) -> bool {
    login.contains('@')
}

impl AuthService {
    /// Verify a login identifier and password against the account store.
    ///
    /// Unknown and inactive accounts are both [`AuthError::UserNotFound`].
    /// Nothing is cached here.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<Account, AuthError> {
        let lookup = if is_email_login(login) {
            self.accounts.get_by_email(login).await
        } else {
            self.accounts.get_by_username(login).await
        };

        let account = match lookup {
            Ok(account) => account,
            Err(UserError::NotFound) => return Err(AuthError::UserNotFound.log()),
            Err(e) => return Err(e.into()),
        };

        if !account.is_active {
            tracing::debug!("Account is inactive");
            return Err(AuthError::UserNotFound.log());
        }

        if !account.check_password(password) {
            return Err(AuthError::InvalidPassword.log());
        }

        Ok(account)
    }

    /// Start a session for `account` with the configured session TTL.
    pub async fn login_user(
        &self,
        ctx: &mut RequestContext,
        account: &Account,
    ) -> Result<SessionInfo, AuthError> {
        self.login_user_with_expiration(ctx, account, self.config.session_ttl)
            .await
    }

    /// Start a session for `account` that expires after `expiration`.
    ///
    /// The session named by the incoming cookie, if any, is replaced. The
    /// last-login timestamp is updated on a best-effort basis. The cached
    /// identity of the account is left as is.
    #[tracing::instrument(skip(self, ctx, account), fields(username = %account.username))]
    pub async fn login_user_with_expiration(
        &self,
        ctx: &mut RequestContext,
        account: &Account,
        expiration: Duration,
    ) -> Result<SessionInfo, AuthError> {
        let session = self
            .sessions
            .create_session(ctx, &account.username, expiration)
            .await?;

        let updated = Account {
            last_login_at: Some(Utc::now()),
            ..account.clone()
        };
        if let Err(e) = self.accounts.update(&updated).await {
            tracing::warn!("Failed to update time of last login: {}", e);
        }

        ctx.set_user(User::from(account));
        tracing::info!("User logged in");
        Ok(session)
    }

    /// End the current session and clear the session cookie.
    ///
    /// Logging out without a session is a no-op apart from the clearing
    /// cookie.
    pub async fn logout_user(&self, ctx: &mut RequestContext) -> Result<(), AuthError> {
        self.sessions.destroy_session(ctx).await?;
        ctx.set_user(User::anonymous());
        Ok(())
    }
}
