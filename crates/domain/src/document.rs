//! The persisted access document.

use std::collections::HashMap;

use keyward_core::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Account, RoleDefinition};

/// Schema version written with every document.
pub const ACCESS_DOCUMENT_VERSION: i64 = 2;

/// Single external artifact holding every account and custom role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDocument {
    /// Accounts keyed by username.
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: HashMap<String, Account>,
    /// Custom roles keyed by name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: HashMap<String, RoleDefinition>,
    /// Reserved for future migrations.
    #[serde(default)]
    pub version: i64,
}

impl AccessDocument {
    /// Builds a document at the current schema version.
    #[must_use]
    pub fn new(users: HashMap<String, Account>, roles: HashMap<String, RoleDefinition>) -> Self {
        Self {
            users,
            roles,
            version: ACCESS_DOCUMENT_VERSION,
        }
    }

    /// Parses a stored document.
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(bytes).map_err(|error| {
            AppError::Internal(format!("failed to parse access document: {error}"))
        })
    }

    /// Serializes the document for storage.
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|error| {
            AppError::Internal(format!("failed to serialize access document: {error}"))
        })
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
