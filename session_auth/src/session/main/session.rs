use std::sync::Arc;
use std::time::Duration;

use crate::session::context::RequestContext;
use crate::session::errors::SessionError;
use crate::session::types::SessionInfo;
use crate::storage::{SessionStore, StorageError};
use crate::utils::gen_random_string;

use super::cookie::{clear_session_cookie, set_session_cookie};

/// Number of random bytes in a session identifier
const SESSION_ID_BYTES: usize = 32;

/// Resolves, creates and destroys cookie-bound sessions backed by a
/// [`SessionStore`].
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    cookie_name: String,
    ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie_name", &self.cookie_name)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, cookie_name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
            ttl,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Resolve the session named by the request's session cookie.
    ///
    /// A cookie the store no longer knows is cleared on the client and
    /// reported as no session. Store failures propagate. The outcome is
    /// memoized on the context.
    pub async fn resolve(
        &self,
        ctx: &mut RequestContext,
    ) -> Result<Option<SessionInfo>, SessionError> {
        if let Some(memo) = ctx.session() {
            return Ok(memo.cloned());
        }

        let Some(session_id) = ctx.cookie(&self.cookie_name) else {
            tracing::debug!("No session cookie found");
            ctx.set_session(None);
            return Ok(None);
        };

        let session = match self.store.get(&session_id).await {
            Ok(username) => Some(SessionInfo {
                id: session_id,
                username,
            }),
            Err(StorageError::NotFound) => {
                tracing::debug!("Session cookie refers to an unknown or expired session");
                clear_session_cookie(ctx, &self.cookie_name)?;
                None
            }
            Err(e) => {
                tracing::error!("Failed to look up session: {}", e);
                return Err(SessionError::Storage(e));
            }
        };

        ctx.set_session(session.clone());
        Ok(session)
    }

    /// Persist a new session for `username` and queue its cookie.
    ///
    /// Any session named by the incoming cookie is deleted from the store on a
    /// best-effort basis. Other sessions of the same account are untouched.
    #[tracing::instrument(skip(self, ctx, username), fields(username = %username))]
    pub async fn create_session(
        &self,
        ctx: &mut RequestContext,
        username: &str,
        ttl: Duration,
    ) -> Result<SessionInfo, SessionError> {
        let session_id = gen_random_string(SESSION_ID_BYTES)?;
        self.store.set(&session_id, username, ttl).await?;

        if let Some(old_id) = ctx.cookie(&self.cookie_name) {
            if let Err(e) = self.store.delete(&old_id).await {
                tracing::error!("Failed to delete previous session: {}", e);
            }
        }

        set_session_cookie(ctx, &self.cookie_name, &session_id, ttl)?;

        let session = SessionInfo {
            id: session_id,
            username: username.to_string(),
        };
        ctx.set_session(Some(session.clone()));
        tracing::debug!("Created new session");
        Ok(session)
    }

    /// Delete the current session, if any, and queue a clearing cookie.
    pub async fn destroy_session(&self, ctx: &mut RequestContext) -> Result<(), SessionError> {
        if let Some(session_id) = ctx.cookie(&self.cookie_name) {
            if let Err(e) = self.store.delete(&session_id).await {
                tracing::error!("Failed to delete session on logout: {}", e);
            }
        }

        clear_session_cookie(ctx, &self.cookie_name)?;
        ctx.set_session(None);
        Ok(())
    }
}
