//! Account domain types.

use serde::{Deserialize, Serialize};

use crate::document::null_as_default;

/// Principal able to authenticate, as stored in the access document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identity key.
    pub username: String,
    /// Names of the system or custom roles granted to the account.
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    /// One-way hash of the account secret.
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Unix timestamp of the last successful write.
    #[serde(default)]
    pub last_update: i64,
    /// Disabled accounts cannot authenticate and hold no permissions.
    #[serde(default)]
    pub enabled: bool,
    /// Unix timestamp after which the secret must be rotated.
    #[serde(default)]
    pub pwd_expiration_date: Option<i64>,
    /// Whether the secret must be changed on next login.
    #[serde(default)]
    pub pwd_update_required: bool,
}

impl Account {
    /// Returns whether the account grants the named role.
    #[must_use]
    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|role| role == role_name)
    }
}
