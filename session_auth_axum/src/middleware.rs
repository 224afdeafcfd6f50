use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::header::{HeaderMap, SET_COOKIE};
use http::{Method, StatusCode};
use session_auth::{AuthService, RequestContext};

use super::config::AUTH_REDIRECT_ANON;
use super::error::IntoResponseError;
use super::session::{AuthRejection, CurrentUser};

/// Resolve the request identity once and make it available as [`CurrentUser`].
///
/// Cookies queued during resolution, such as clearing a stale session
/// cookie, are added to the response unless the handler already set the
/// session cookie itself.
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use session_auth_axum::{AuthService, identity_middleware};
///
/// fn app(auth: Arc<AuthService>) -> Router {
///     Router::new()
///         .route("/", get(|| async { "hello" }))
///         .layer(from_fn_with_state(auth, identity_middleware))
/// }
/// ```
pub async fn identity_middleware(
    State(auth): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Response {
    let mut ctx = RequestContext::new(req.headers().clone());
    let resolved = auth.get_user(&mut ctx).await.into_response_error();
    let queued = ctx.take_response_headers();

    let user = match resolved {
        Ok(user) => user,
        Err(err) => {
            let mut response = err.into_response();
            append_session_cookies(response.headers_mut(), &queued, auth.session_cookie_name());
            return response;
        }
    };

    tracing::debug!(
        username = %user.username,
        authenticated = user.is_authenticated,
        "Resolved request identity"
    );
    req.extensions_mut().insert(CurrentUser(user));

    let mut response = next.run(req).await;
    append_session_cookies(response.headers_mut(), &queued, auth.session_cookie_name());
    response
}

fn append_session_cookies(headers: &mut HeaderMap, queued: &HeaderMap, cookie_name: &str) {
    if queued.is_empty() {
        return;
    }

    let prefix = format!("{cookie_name}=");
    let handler_set_cookie = headers
        .get_all(SET_COOKIE)
        .iter()
        .any(|v| v.to_str().is_ok_and(|s| s.starts_with(&prefix)));
    if handler_set_cookie {
        tracing::debug!("Handler set the session cookie, dropping queued cookies");
        return;
    }

    for (name, value) in queued {
        headers.append(name.clone(), value.clone());
    }
}

fn current_user(req: &Request) -> Option<&CurrentUser> {
    let user = req.extensions().get::<CurrentUser>();
    if user.is_none() {
        tracing::warn!("Guard used without identity_middleware");
    }
    user
}

/// Reject unauthenticated requests with 401.
pub async fn login_required(req: Request, next: Next) -> Response {
    let authenticated = current_user(&req).is_some_and(|u| u.is_authenticated);
    if !authenticated {
        return AuthRejection::Unauthorized.into_response();
    }
    next.run(req).await
}

/// Like [`login_required`], but anonymous GET requests are redirected to
/// `AUTH_REDIRECT_ANON`.
pub async fn login_required_or_redirect(req: Request, next: Next) -> Response {
    let authenticated = current_user(&req).is_some_and(|u| u.is_authenticated);
    if authenticated {
        return next.run(req).await;
    }

    if req.method() == Method::GET {
        tracing::debug!("Redirecting to {}", AUTH_REDIRECT_ANON.as_str());
        Redirect::temporary(AUTH_REDIRECT_ANON.as_str()).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

/// Reject unauthenticated requests with 401 and non-superusers with 403.
pub async fn superuser_required(req: Request, next: Next) -> Response {
    let (authenticated, superuser) = current_user(&req)
        .map(|u| (u.is_authenticated, u.is_superuser))
        .unwrap_or_default();

    if !authenticated {
        return AuthRejection::Unauthorized.into_response();
    }
    if !superuser {
        return AuthRejection::Forbidden.into_response();
    }
    next.run(req).await
}
