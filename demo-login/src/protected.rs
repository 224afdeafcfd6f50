use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    response::{Html, IntoResponse},
    routing::get,
};

use session_auth_axum::{
    AUTH_ROUTE_PREFIX, AuthService, AuthUser, CurrentUser, identity_middleware,
    login_required_or_redirect, superuser_required,
};

pub(super) fn router(auth: Arc<AuthService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/p1", get(p1))
        .route("/p2", get(p2))
        .route(
            "/p3",
            get(p3).route_layer(from_fn(login_required_or_redirect)),
        )
        .route(
            "/admin",
            get(admin).route_layer(from_fn(superuser_required)),
        )
        .layer(from_fn_with_state(auth.clone(), identity_middleware))
        .with_state(auth)
}

pub(crate) async fn index(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    let prefix = AUTH_ROUTE_PREFIX.as_str();
    if user.is_authenticated {
        Html(format!(
            "Hey {}!<br/><a href=\"{prefix}/logout\">Logout</a>",
            user.username
        ))
    } else {
        Html(format!(
            "<form method=\"post\" action=\"{prefix}/login\">\
             <input name=\"username\" placeholder=\"username or email\"/>\
             <input name=\"password\" type=\"password\"/>\
             <button type=\"submit\">Login</button></form>"
        ))
    }
}

// Rejects anonymous users with 401 through the extractor
pub(crate) async fn p1(user: AuthUser) -> impl IntoResponse {
    Html(format!("Hey {} ({})!", user.full_name(), user.email))
}

// Optional extractor never rejects
pub(crate) async fn p2(user: Option<AuthUser>) -> impl IntoResponse {
    match user {
        Some(u) => Html(format!("Hey {}!", u.username)),
        None => Html("Hey Anonymous User!".to_string()),
    }
}

// Protected by middleware, no user argument needed
pub(crate) async fn p3() -> impl IntoResponse {
    Html("This is a protected page.")
}

pub(crate) async fn admin(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Html(format!("Welcome to the admin area, {}.", user.username))
}
