//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod document;
mod role;
mod security;
mod system_roles;

pub use account::Account;
pub use document::{ACCESS_DOCUMENT_VERSION, AccessDocument};
pub use role::{RoleDefinition, merge_role_grants};
pub use security::{Permission, Scope, ScopePermissions, parse_scope_permissions};
pub use system_roles::{find_system_role, is_system_role, system_roles};
