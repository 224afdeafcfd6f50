use serde::{Deserialize, Serialize};

use crate::userdb::Account;

/// A live session: the opaque identifier and the username that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: String,
    pub username: String,
}

/// Read-only identity projected from an account, used for authorization
/// decisions within a request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    #[serde(skip)]
    pub is_authenticated: bool,
    pub is_guest: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile: Option<serde_json::Value>,
}

impl User {
    /// Identity of a request carrying no session and no credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Explicit guest identity for permissive, degraded access
    pub fn guest() -> Self {
        Self {
            is_guest: true,
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl From<&Account> for User {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            is_superuser: account.is_superuser,
            is_authenticated: true,
            is_guest: false,
            profile: account.profile.clone(),
        }
    }
}

impl From<Account> for User {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}
