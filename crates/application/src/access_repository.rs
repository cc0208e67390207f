//! Account and role repository.
//!
//! Holds the authoritative in-memory view of every account and custom role
//! and writes it through to the document store on every mutation. A write
//! that fails to persist reloads the cache from the store before the error
//! is returned, so readers never observe state the store does not hold.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use keyward_core::AppResult;
use keyward_domain::{Account, AccessDocument, RoleDefinition};

use crate::{DocumentStore, PasswordHasher};

mod accounts;
mod permissions;
mod persistence;
mod roles;


/// Input payload for account create and update operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInput {
    /// Account identity key.
    pub username: String,
    /// Plaintext secret. Required on create, optional on update.
    pub password: Option<String>,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional email address.
    pub email: Option<String>,
    /// Whether the account may authenticate.
    pub enabled: bool,
    /// Names of granted roles.
    pub roles: Vec<String>,
    /// Unix timestamp after which the secret must be rotated.
    pub pwd_expiration_date: Option<i64>,
    /// Whether the secret must be changed on next login.
    pub pwd_update_required: bool,
}

/// Input payload for custom role create and update operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleInput {
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Requested system flag. Always rejected when set.
    pub system: bool,
    /// Raw scope to permission grants as received from transport.
    pub scopes_permissions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
struct AccessState {
    users: HashMap<String, Account>,
    roles: HashMap<String, RoleDefinition>,
}

impl AccessState {
    fn from_document(document: AccessDocument) -> Self {
        Self {
            users: document.users,
            roles: document.roles,
        }
    }

    fn to_document(&self) -> AccessDocument {
        AccessDocument::new(self.users.clone(), self.roles.clone())
    }
}

/// Shared, write-through repository of accounts and custom roles.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Clone)]
pub struct AccessRepository {
    store: Arc<dyn DocumentStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    state: Arc<RwLock<AccessState>>,
}

impl AccessRepository {
    /// Loads the repository from the document store.
    ///
    /// A store that was never written yields an empty repository. A stored
    /// document that fails to parse is returned as an error.
    pub async fn load(
        store: Arc<dyn DocumentStore>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> AppResult<Self> {
        let state = persistence::fetch_state(store.as_ref()).await?;
        tracing::info!(
            accounts = state.users.len(),
            custom_roles = state.roles.len(),
            "access repository loaded"
        );

        Ok(Self {
            store,
            password_hasher,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Returns the cached state in its persisted document form.
    pub async fn export_document(&self) -> AccessDocument {
        self.state.read().await.to_document()
    }
}
