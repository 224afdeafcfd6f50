mod errors;
mod session_store;

pub use errors::StorageError;
pub use session_store::{
    InMemorySessionStore, RedisSessionStore, SessionStore, create_session_store,
    session_store_from_env,
};
