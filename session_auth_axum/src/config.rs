//! Central configuration for the session-auth-axum crate

use std::sync::LazyLock;

/// Mount point of the authentication routes
/// Default: "/auth"
pub static AUTH_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    route_prefix_from(std::env::var("AUTH_ROUTE_PREFIX").ok().as_deref())
});

/// Where anonymous GET requests are sent by the redirecting guard
/// Default: "/"
pub static AUTH_REDIRECT_ANON: LazyLock<String> =
    LazyLock::new(|| std::env::var("AUTH_REDIRECT_ANON").unwrap_or_else(|_| "/".to_string()));

fn route_prefix_from(env_value: Option<&str>) -> String {
    let prefix = env_value
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("/auth")
        .trim_end_matches('/');
    if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{prefix}")
    }
}
