mod errors;
mod password;
mod storage;
mod types;

pub use errors::UserError;
pub use password::{hash_password, verify_password};
pub use storage::{
    AccountStore, InMemoryAccountStore, SqlAccountStore, account_store_from_env,
    create_account_store,
};
pub use types::Account;
