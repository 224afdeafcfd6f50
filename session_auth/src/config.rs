//! Configuration surface of the identity resolution core

use std::time::Duration;

/// Default name of the session cookie
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "session_id";

/// Default lifetime of a login session (14 days)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Default lifetime of identity-cache and credential-cache entries
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(45);

/// Durations and names consumed by [`crate::AuthService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Name of the cookie carrying the session identifier
    pub session_cookie_name: String,
    /// Expiration of sessions created by a regular login
    pub session_ttl: Duration,
    /// Fixed TTL of the username -> identity cache
    pub identity_cache_ttl: Duration,
    /// Fixed TTL of the Authorization header -> identity cache
    pub credential_cache_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            session_ttl: DEFAULT_SESSION_TTL,
            identity_cache_ttl: DEFAULT_CACHE_TTL,
            credential_cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl AuthConfig {
    /// Reads `SESSION_COOKIE_NAME`, `SESSION_TTL_SECS`, `IDENTITY_CACHE_TTL_SECS`
    /// and `CREDENTIAL_CACHE_TTL_SECS`, falling back to defaults for absent or
    /// unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            session_cookie_name: lookup("SESSION_COOKIE_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string()),
            session_ttl: secs("SESSION_TTL_SECS", DEFAULT_SESSION_TTL),
            identity_cache_ttl: secs("IDENTITY_CACHE_TTL_SECS", DEFAULT_CACHE_TTL),
            credential_cache_ttl: secs("CREDENTIAL_CACHE_TTL_SECS", DEFAULT_CACHE_TTL),
        }
    }

    pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.session_cookie_name = name.into();
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_identity_cache_ttl(mut self, ttl: Duration) -> Self {
        self.identity_cache_ttl = ttl;
        self
    }

    pub fn with_credential_cache_ttl(mut self, ttl: Duration) -> Self {
        self.credential_cache_ttl = ttl;
        self
    }
}
