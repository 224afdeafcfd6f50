use crate::session::{RequestContext, SessionInfo, User};
use crate::utils::base64_decode;

use super::errors::AuthError;
use super::service::AuthService;

const BASIC_SCHEME: &str = "basic";

/// Split a `Basic` Authorization header into login and password.
///
/// Other schemes yield `Ok(None)`. A Basic header whose payload is not
/// base64 of UTF-8 `login:password` is malformed.
pub(super) fn parse_basic_credentials(
    header: &str,
) -> Result<Option<(String, String)>, AuthError> {
    let Some((scheme, payload)) = header.split_once(' ') else {
        return Ok(None);
    };
    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return Ok(None);
    }

    let decoded = base64_decode(payload.trim())
        .map_err(|e| AuthError::MalformedCredentials(e.to_string()))?;
    let decoded = String::from_utf8(decoded).map_err(|_| {
        AuthError::MalformedCredentials("credentials are not valid UTF-8".to_string())
    })?;
    let (login, password) = decoded.split_once(':').ok_or_else(|| {
        AuthError::MalformedCredentials("credentials lack a ':' separator".to_string())
    })?;

    Ok(Some((login.to_string(), password.to_string())))
}

impl AuthService {
    /// Resolve who the request is from.
    ///
    /// An Authorization header takes precedence over the session cookie. A
    /// request with neither, or whose session owner cannot be loaded, is
    /// anonymous. The identity is memoized on the context.
    pub async fn get_user(&self, ctx: &mut RequestContext) -> Result<User, AuthError> {
        if let Some(user) = ctx.user() {
            return Ok(user.clone());
        }

        let user = match ctx.authorization().map(str::to_string) {
            Some(header) => self.user_from_authorization(header).await?,
            None => self.user_from_session(ctx).await?,
        };

        ctx.set_user(user.clone());
        Ok(user)
    }

    /// The session named by the request cookie, if it is still live.
    pub async fn get_session_info(
        &self,
        ctx: &mut RequestContext,
    ) -> Result<Option<SessionInfo>, AuthError> {
        Ok(self.sessions.resolve(ctx).await?)
    }

    async fn user_from_authorization(&self, header: String) -> Result<User, AuthError> {
        if let Some(user) = self.credential_cache.get(&header).await {
            return Ok(user);
        }

        let Some((login, password)) = parse_basic_credentials(&header)? else {
            tracing::debug!("Unsupported Authorization scheme, resolving as anonymous");
            return Ok(User::anonymous());
        };

        // Failures are not cached so a wrong password cannot lock the header out
        let account = self.authenticate(&login, &password).await?;
        let user = User::from(&account);
        self.credential_cache.insert(header, user.clone()).await;
        tracing::debug!(username = %user.username, "Resolved identity from Basic credentials");
        Ok(user)
    }

    async fn user_from_session(&self, ctx: &mut RequestContext) -> Result<User, AuthError> {
        let Some(session) = self.sessions.resolve(ctx).await? else {
            return Ok(User::anonymous());
        };

        match self.identity_cache.get_or_load(&session.username).await {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(
                    username = %session.username,
                    "No identity for session owner, resolving as anonymous"
                );
                Ok(User::anonymous())
            }
        }
    }
}
