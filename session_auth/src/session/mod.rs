mod context;
mod errors;
mod main;
mod types;

pub use context::RequestContext;
pub use errors::SessionError;
pub use main::SessionManager;
pub use types::{SessionInfo, User};
