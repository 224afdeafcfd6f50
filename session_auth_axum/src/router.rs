//! Router for the authentication endpoints

use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state};
use session_auth::AuthService;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::middleware::identity_middleware;

/// Create a router for the authentication endpoints
///
/// Mount it under [`crate::AUTH_ROUTE_PREFIX`]; the endpoints are
/// - `POST {prefix}/login`
/// - `GET|POST {prefix}/logout`
/// - `GET {prefix}/session`
pub fn session_auth_router(auth: Arc<AuthService>) -> Router {
    session_auth_router_no_trace(auth).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`session_auth_router`] without HTTP request tracing.
pub fn session_auth_router_no_trace(auth: Arc<AuthService>) -> Router {
    super::user::router()
        .layer(from_fn_with_state(auth.clone(), identity_middleware))
        .with_state(auth)
}
