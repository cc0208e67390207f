use keyward_core::AppError;
use keyward_domain::{
    ScopePermissions, find_system_role, is_system_role, parse_scope_permissions, system_roles,
};

use super::*;

impl AccessRepository {
    /// Lists system roles in catalogue order followed by custom roles
    /// ordered by name.
    pub async fn list_roles(&self) -> Vec<RoleDefinition> {
        let state = self.state.read().await;
        let mut custom: Vec<RoleDefinition> = state.roles.values().cloned().collect();
        custom.sort_by(|left, right| left.name().cmp(right.name()));

        system_roles().iter().cloned().chain(custom).collect()
    }

    /// Returns one role, looking up system roles first.
    pub async fn get_role(&self, name: &str) -> AppResult<RoleDefinition> {
        if let Some(role) = find_system_role(name) {
            return Ok(role.clone());
        }

        self.state
            .read()
            .await
            .roles
            .get(name)
            .cloned()
            .ok_or_else(|| role_not_found(name))
    }

    /// Creates a custom role.
    ///
    /// Name collisions win over payload validation: a name taken by a
    /// system or custom role fails with `AlreadyExists` whatever else the
    /// input carries.
    pub async fn create_role(&self, input: RoleInput) -> AppResult<RoleDefinition> {
        if is_system_role(&input.name) {
            return Err(role_exists(&input.name));
        }

        let created = self
            .write("create_role", move |state| {
                if state.roles.contains_key(&input.name) {
                    return Err(role_exists(&input.name));
                }
                let role = validated_role(input, "system roles cannot be created")?;
                insert_new_role(state, role.clone())?;
                Ok(role)
            })
            .await?;

        tracing::info!(role = %created.name(), "custom role created");
        Ok(created)
    }

    /// Replaces the grants and description of a custom role.
    pub async fn update_role(&self, input: RoleInput) -> AppResult<RoleDefinition> {
        if is_system_role(&input.name) {
            return Err(AppError::InvalidArgument(
                "system roles cannot be modified".to_owned(),
            ));
        }

        let updated = self
            .write("update_role", move |state| {
                let Some(existing) = state.roles.get_mut(&input.name) else {
                    return Err(role_not_found(&input.name));
                };
                let role = validated_role(input, "system roles cannot be modified")?;
                *existing = role.clone();
                Ok(role)
            })
            .await?;

        tracing::info!(role = %updated.name(), "custom role updated");
        Ok(updated)
    }

    /// Deletes a custom role that no account references.
    pub async fn delete_role(&self, name: &str) -> AppResult<()> {
        if is_system_role(name) {
            return Err(AppError::InvalidArgument(
                "system roles cannot be deleted".to_owned(),
            ));
        }

        let key = name.to_owned();
        self.write("delete_role", move |state| {
            if !state.roles.contains_key(&key) {
                return Err(role_not_found(&key));
            }
            if let Some(account) = state.users.values().find(|account| account.has_role(&key)) {
                return Err(AppError::InvalidArgument(format!(
                    "role '{key}' is in use by account '{}'",
                    account.username
                )));
            }

            state.roles.remove(&key);
            Ok(())
        })
        .await?;

        tracing::info!(role = %name, "custom role deleted");
        Ok(())
    }

    /// Copies a system or custom role into a new custom role.
    pub async fn clone_role(&self, source_name: &str, new_name: &str) -> AppResult<RoleDefinition> {
        let source = source_name.to_owned();
        let destination = new_name.to_owned();

        let cloned = self
            .write("clone_role", move |state| {
                let role = state
                    .roles
                    .get(&source)
                    .or_else(|| find_system_role(&source))
                    .ok_or_else(|| role_not_found(&source))?
                    .cloned_as(destination)?;
                insert_new_role(state, role.clone())?;
                Ok(role)
            })
            .await?;

        tracing::info!(source = %source_name, role = %cloned.name(), "role cloned");
        Ok(cloned)
    }
}

fn parse_grants(input: &RoleInput) -> AppResult<ScopePermissions> {
    parse_scope_permissions(
        input
            .scopes_permissions
            .iter()
            .map(|(scope, permissions)| (scope.as_str(), permissions.iter().map(String::as_str))),
    )
}

fn validated_role(input: RoleInput, system_flag_message: &str) -> AppResult<RoleDefinition> {
    let grants = parse_grants(&input)?;
    if input.system {
        return Err(AppError::InvalidArgument(system_flag_message.to_owned()));
    }
    RoleDefinition::new(input.name, input.description, grants)
}

fn insert_new_role(state: &mut AccessState, role: RoleDefinition) -> AppResult<()> {
    if is_system_role(role.name()) || state.roles.contains_key(role.name()) {
        return Err(role_exists(role.name()));
    }

    state.roles.insert(role.name().to_owned(), role);
    Ok(())
}

fn role_exists(name: &str) -> AppError {
    AppError::AlreadyExists(format!("role '{name}' already exists"))
}

fn role_not_found(name: &str) -> AppError {
    AppError::NotFound(format!("role '{name}' not found"))
}
