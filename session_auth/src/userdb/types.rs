use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::UserError;
use super::password::{hash_password, verify_password};

/// Durable account record owned by the account store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Argon2 PHC hash; empty when no password has been set yet
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    /// Free-form profile document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
}

impl Account {
    /// Create an inactive account without a password
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_superuser: false,
            is_active: false,
            created_at: Some(Utc::now()),
            confirmed_at: None,
            last_login_at: None,
            profile: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn check_password(&self, password: &str) -> bool {
        verify_password(password, &self.password)
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), UserError> {
        self.password = hash_password(password)?;
        Ok(())
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}
