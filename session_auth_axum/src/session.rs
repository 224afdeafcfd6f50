use std::ops::Deref;
use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};
use session_auth::{AuthError, AuthService, RequestContext, User};

use super::error::auth_error_status;

/// Why an identity extractor or guard refused a request
#[derive(Debug)]
pub enum AuthRejection {
    /// No authenticated identity
    Unauthorized,
    /// Authenticated, but lacking the required privilege
    Forbidden,
    /// Identity resolution itself failed
    Failed(StatusCode, String),
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        let (status, message) = auth_error_status(&err);
        Self::Failed(status, message)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            Self::Failed(status, message) => (status, message).into_response(),
        }
    }
}

/// The identity of the current request, possibly anonymous.
///
/// Placed in request extensions by [`crate::identity_middleware`]. Without
/// the middleware the extractor resolves the identity itself, in which case
/// cookie compensation headers are not sent.
///
/// ```no_run
/// use session_auth_axum::CurrentUser;
///
/// async fn greet(user: CurrentUser) -> String {
///     if user.is_authenticated {
///         format!("Hello, {}!", user.username)
///     } else {
///         "Hello, stranger!".to_string()
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        tracing::debug!("Identity not resolved by middleware, resolving in extractor");
        let auth = Arc::<AuthService>::from_ref(state);
        let mut ctx = RequestContext::new(parts.headers.clone());
        let user = auth.get_user(&mut ctx).await?;
        parts.extensions.insert(CurrentUser(user.clone()));
        Ok(CurrentUser(user))
    }
}

/// An authenticated identity; anonymous requests are rejected with 401.
///
/// `Option<AuthUser>` never rejects an anonymous request.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_authenticated {
            tracing::debug!("Unauthorized");
            return Err(AuthRejection::Unauthorized);
        }
        Ok(AuthUser(user))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(user) => Ok(Some(user)),
            Err(AuthRejection::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
