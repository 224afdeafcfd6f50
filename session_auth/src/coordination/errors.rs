use thiserror::Error;

use crate::session::SessionError;
use crate::storage::StorageError;
use crate::userdb::UserError;
use crate::utils::UtilError;

/// Errors surfaced by [`crate::AuthService`]
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// No active account matches the login identifier
    #[error("User not found")]
    UserNotFound,

    /// The account exists but the password does not match
    #[error("Invalid password")]
    InvalidPassword,

    /// The Authorization header could not be decoded
    #[error("Malformed credentials: {0}")]
    MalformedCredentials(String),

    #[error("Session error: {0}")]
    Session(SessionError),

    #[error("User error: {0}")]
    User(UserError),

    #[error("Utils error: {0}")]
    Utils(UtilError),
}

impl AuthError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::UserNotFound => tracing::debug!("User not found"),
            Self::InvalidPassword => tracing::debug!("Invalid password"),
            Self::MalformedCredentials(msg) => tracing::debug!("Malformed credentials: {}", msg),
            Self::Session(err) => tracing::error!("Session error: {}", err),
            Self::User(err) => tracing::error!("User error: {}", err),
            Self::Utils(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }

    /// Failed credentials, either an unknown account or a wrong password.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::UserNotFound | Self::InvalidPassword)
    }

    /// Bad input from the client.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedCredentials(_))
    }

    /// An unavailable or failing backing store; the request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Session(SessionError::Storage(StorageError::Storage(_)))
                | Self::User(UserError::Storage(_))
        )
    }
}

// Infrastructure errors are logged once as they cross into this layer

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        let error = Self::Session(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        let error = Self::User(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UtilError> for AuthError {
    fn from(err: UtilError) -> Self {
        let error = Self::Utils(err);
        tracing::error!("{}", error);
        error
    }
}
