use std::collections::BTreeMap;

use keyward_application::{AccountInput, LoginOutcome, RoleInput, TokenCheck};
use keyward_domain::{Account, RoleDefinition, ScopePermissions};
use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of an account. Never carries the secret hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub roles: Vec<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub last_update: i64,
    pub enabled: bool,
    pub pwd_expiration_date: Option<i64>,
    pub pwd_update_required: bool,
}

impl From<Account> for UserResponse {
    fn from(value: Account) -> Self {
        Self {
            username: value.username,
            roles: value.roles,
            name: value.name,
            email: value.email,
            last_update: value.last_update,
            enabled: value.enabled,
            pwd_expiration_date: value.pwd_expiration_date,
            pwd_update_required: value.pwd_update_required,
        }
    }
}

/// Incoming payload for account creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub pwd_expiration_date: Option<i64>,
    #[serde(default)]
    pub pwd_update_required: bool,
}

impl From<CreateUserRequest> for AccountInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            username: value.username,
            password: Some(value.password),
            name: value.name,
            email: value.email,
            enabled: value.enabled,
            roles: value.roles,
            pwd_expiration_date: value.pwd_expiration_date,
            pwd_update_required: value.pwd_update_required,
        }
    }
}

/// Incoming payload for account replacement. The username comes from the
/// path.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub pwd_expiration_date: Option<i64>,
    #[serde(default)]
    pub pwd_update_required: bool,
}

impl UpdateUserRequest {
    pub fn into_input(self, username: String) -> AccountInput {
        AccountInput {
            username,
            password: self.password,
            name: self.name,
            email: self.email,
            enabled: self.enabled,
            roles: self.roles,
            pwd_expiration_date: self.pwd_expiration_date,
            pwd_update_required: self.pwd_update_required,
        }
    }
}

/// Incoming payload for a self-service password change.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// API representation of a role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub name: String,
    pub description: Option<String>,
    pub system: bool,
    pub scopes_permissions: BTreeMap<String, Vec<String>>,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            name: value.name().to_owned(),
            description: value.description().map(str::to_owned),
            system: value.is_system(),
            scopes_permissions: grants_to_transport(value.scopes_permissions()),
        }
    }
}

/// Incoming payload for custom role creation and replacement.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub scopes_permissions: BTreeMap<String, Vec<String>>,
}

impl From<RoleRequest> for RoleInput {
    fn from(value: RoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            system: value.system,
            scopes_permissions: value.scopes_permissions,
        }
    }
}

/// Incoming payload for role cloning.
#[derive(Debug, Deserialize)]
pub struct CloneRoleRequest {
    pub new_name: String,
}

/// Incoming payload for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub username: String,
    pub pwd_update_required: bool,
    pub pwd_expiration_date: Option<i64>,
    pub permissions: BTreeMap<String, Vec<String>>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(value: LoginOutcome) -> Self {
        Self {
            token: value.token,
            expires_at: value.expires_at,
            username: value.username,
            pwd_update_required: value.pwd_update_required,
            pwd_expiration_date: value.pwd_expiration_date,
            permissions: grants_to_transport(&value.permissions),
        }
    }
}

/// Incoming payload for token checks.
#[derive(Debug, Deserialize)]
pub struct CheckTokenRequest {
    pub token: String,
}

/// Token check payload.
#[derive(Debug, Serialize)]
pub struct CheckTokenResponse {
    pub valid: bool,
    pub username: Option<String>,
    pub permissions: BTreeMap<String, Vec<String>>,
}

impl From<TokenCheck> for CheckTokenResponse {
    fn from(value: TokenCheck) -> Self {
        Self {
            valid: value.valid,
            username: value.username,
            permissions: grants_to_transport(&value.permissions),
        }
    }
}

fn grants_to_transport(grants: &ScopePermissions) -> BTreeMap<String, Vec<String>> {
    grants
        .iter()
        .map(|(scope, permissions)| {
            (
                scope.as_str().to_owned(),
                permissions
                    .iter()
                    .map(|permission| permission.as_str().to_owned())
                    .collect(),
            )
        })
        .collect()
}

fn enabled_by_default() -> bool {
    true
}
