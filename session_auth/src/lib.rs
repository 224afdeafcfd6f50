//! session-auth - session and identity resolution for HTTP servers
//!
//! Turns an incoming request (session cookie or Basic credentials) into a
//! resolved [`User`], backed by a durable [`SessionStore`] and an
//! [`AccountStore`], with TTL-bounded identity caches in between.

mod cache;
mod config;
mod coordination;
mod session;
mod storage;
mod userdb;
mod utils;

pub use cache::{CacheLoader, TtlCache};

pub use config::{AuthConfig, DEFAULT_CACHE_TTL, DEFAULT_SESSION_COOKIE_NAME, DEFAULT_SESSION_TTL};

pub use coordination::{AuthError, AuthService};

pub use session::{RequestContext, SessionError, SessionInfo, SessionManager, User};

pub use storage::{
    InMemorySessionStore, RedisSessionStore, SessionStore, StorageError, create_session_store,
    session_store_from_env,
};

pub use userdb::{
    Account, AccountStore, InMemoryAccountStore, SqlAccountStore, UserError,
    account_store_from_env, create_account_store, hash_password, verify_password,
};

pub use utils::{UtilError, gen_random_string};
