use thiserror::Error;

#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    /// More than one account matched a lookup that must be unique
    #[error("Ambiguous account lookup: {0}")]
    Ambiguous(String),

    #[error("Account already exists: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Password error: {0}")]
    Password(String),
}

impl UserError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<serde_json::Error> for UserError {
    fn from(err: serde_json::Error) -> Self {
        UserError::InvalidData(err.to_string())
    }
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => UserError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                UserError::Conflict(db.message().to_string())
            }
            other => UserError::Storage(other.to_string()),
        }
    }
}
