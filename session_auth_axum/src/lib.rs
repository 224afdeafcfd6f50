//! session-auth-axum - axum integration for session-auth
//!
//! Provides the identity-resolution middleware, guards, extractors and the
//! login/logout/session routes.

mod config;
mod error;
mod middleware;
mod router;
mod session;
mod user;

pub use config::{AUTH_REDIRECT_ANON, AUTH_ROUTE_PREFIX};
pub use error::IntoResponseError;
pub use middleware::{
    identity_middleware, login_required, login_required_or_redirect, superuser_required,
};
pub use router::{session_auth_router, session_auth_router_no_trace};
pub use session::{AuthRejection, AuthUser, CurrentUser};

// Re-export the core types applications need to wire the router
pub use session_auth::{
    Account, AccountStore, AuthConfig, AuthError, AuthService, InMemoryAccountStore,
    InMemorySessionStore, SessionStore, User, account_store_from_env, session_store_from_env,
};
