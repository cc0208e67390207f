use std::collections::BTreeSet;

use keyward_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::document::null_as_default;
use crate::{Permission, Scope, ScopePermissions};

/// Named bundle of scope permission grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "system", default)]
    is_system: bool,
    #[serde(
        rename = "scopes_permissions",
        default,
        deserialize_with = "null_as_default"
    )]
    scopes_permissions: ScopePermissions,
}

impl RoleDefinition {
    /// Creates a validated custom role definition.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        scopes_permissions: ScopePermissions,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)
            .map_err(|_| AppError::InvalidArgument("role name is empty".to_owned()))?;

        Ok(Self {
            name: name.into(),
            description,
            is_system: false,
            scopes_permissions,
        })
    }

    pub(crate) fn system(
        name: &str,
        description: &str,
        grants: &[(Scope, &[Permission])],
    ) -> Self {
        let scopes_permissions = grants
            .iter()
            .map(|(scope, permissions)| (*scope, permissions.iter().copied().collect()))
            .collect();

        Self {
            name: name.to_owned(),
            description: Some(description.to_owned()),
            is_system: true,
            scopes_permissions,
        }
    }

    /// Returns a non-system copy of this role under a new name.
    pub fn cloned_as(&self, new_name: impl Into<String>) -> AppResult<Self> {
        Self::new(
            new_name,
            self.description.clone(),
            self.scopes_permissions.clone(),
        )
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the role ships with the system.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Returns the granted permissions per scope.
    #[must_use]
    pub fn scopes_permissions(&self) -> &ScopePermissions {
        &self.scopes_permissions
    }

    /// Returns the permissions granted in one scope.
    #[must_use]
    pub fn permissions_in(&self, scope: Scope) -> BTreeSet<Permission> {
        self.scopes_permissions
            .get(&scope)
            .cloned()
            .unwrap_or_default()
    }
}

/// Unions the grants of every role into one deduplicated mapping.
#[must_use]
pub fn merge_role_grants<'a>(roles: impl IntoIterator<Item = &'a RoleDefinition>) -> ScopePermissions {
    let mut merged = ScopePermissions::new();
    for role in roles {
        for (scope, permissions) in role.scopes_permissions() {
            merged
                .entry(*scope)
                .or_default()
                .extend(permissions.iter().copied());
        }
    }

    merged.retain(|_, permissions| !permissions.is_empty());
    merged
}
