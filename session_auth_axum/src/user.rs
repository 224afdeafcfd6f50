use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::header::{CONTENT_TYPE, HeaderMap};
use serde::{Deserialize, Serialize};
use session_auth::{AuthService, RequestContext, User};

use crate::error::IntoResponseError;
use crate::session::CurrentUser;

/// Routes for logging in, logging out and inspecting the session
pub(super) fn router() -> Router<Arc<AuthService>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout).post(logout))
        .route("/session", get(session))
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

/// Login payload from either a JSON or a URL-encoded form body.
pub(crate) struct LoginPayload(LoginForm);

impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let form = if is_json {
            Json::<LoginForm>::from_request(req, state)
                .await
                .map(|Json(form)| form)
                .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()).into_response())?
        } else {
            Form::<LoginForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()).into_response())?
        };

        if form.username.trim().is_empty() || form.password.is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                "username and password are required",
            )
                .into_response());
        }
        Ok(Self(form))
    }
}

#[derive(Debug, Serialize)]
struct SessionData {
    user: User,
}

/// Verify credentials, start a session and return the logged-in identity.
async fn login(
    State(auth): State<Arc<AuthService>>,
    headers: HeaderMap,
    LoginPayload(form): LoginPayload,
) -> Result<Response, (StatusCode, String)> {
    let account = auth
        .authenticate(&form.username, &form.password)
        .await
        .into_response_error()?;

    let mut ctx = RequestContext::new(headers);
    auth.login_user(&mut ctx, &account)
        .await
        .into_response_error()?;

    tracing::debug!(username = %account.username, "Login succeeded");
    Ok((ctx.take_response_headers(), Json(User::from(&account))).into_response())
}

/// End the current session. Always succeeds for the client.
async fn logout(State(auth): State<Arc<AuthService>>, headers: HeaderMap) -> Response {
    let mut ctx = RequestContext::new(headers);
    match auth.logout_user(&mut ctx).await.into_response_error() {
        Ok(()) => (ctx.take_response_headers(), StatusCode::OK).into_response(),
        Err(err) => err.into_response(),
    }
}

/// The identity of the caller, anonymous included.
async fn session(CurrentUser(user): CurrentUser) -> Json<SessionData> {
    Json(SessionData { user })
}
