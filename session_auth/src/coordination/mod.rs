//! Identity resolution and the login/logout lifecycle
//!
//! - `service`: the [`AuthService`] and its caches
//! - `identity`: resolving a request to a [`crate::User`]
//! - `login`: credential verification, login and logout

mod errors;
mod identity;
mod login;
mod service;

pub use errors::AuthError;
pub use service::AuthService;
