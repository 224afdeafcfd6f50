mod config;
mod memory;
mod postgres;
mod sqlite;
mod store_type;
mod types;

pub use config::{account_store_from_env, create_account_store};
pub use types::{AccountStore, InMemoryAccountStore, SqlAccountStore};
