use keyward_core::{AppError, NonEmptyString};
use keyward_domain::find_system_role;

use super::*;

impl AccessRepository {
    /// Lists every account ordered by username.
    pub async fn list_accounts(&self) -> Vec<Account> {
        let state = self.state.read().await;
        let mut accounts: Vec<Account> = state.users.values().cloned().collect();
        accounts.sort_by(|left, right| left.username.cmp(&right.username));
        accounts
    }

    /// Returns one account.
    pub async fn get_account(&self, username: &str) -> AppResult<Account> {
        self.state
            .read()
            .await
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("account '{username}' not found")))
    }

    /// Creates an account with a freshly hashed secret.
    pub async fn create_account(&self, input: AccountInput) -> AppResult<Account> {
        let username = NonEmptyString::new(input.username.clone())
            .map_err(|_| AppError::InvalidArgument("username is empty".to_owned()))?;
        let password = input
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .ok_or_else(|| AppError::InvalidArgument("password is empty".to_owned()))?;
        let password_hash = self.password_hasher.hash_password(password)?;

        let created = self
            .write("create_account", move |state| {
                if state.users.contains_key(username.as_str()) {
                    return Err(AppError::AlreadyExists(format!(
                        "account '{}' already exists",
                        username.as_str()
                    )));
                }
                validate_role_references(state, &input.roles)?;

                let account = Account {
                    username: username.into(),
                    roles: input.roles,
                    password_hash,
                    name: input.name,
                    email: input.email,
                    last_update: now_unix(),
                    enabled: input.enabled,
                    pwd_expiration_date: input.pwd_expiration_date,
                    pwd_update_required: input.pwd_update_required,
                };
                state
                    .users
                    .insert(account.username.clone(), account.clone());
                Ok(account)
            })
            .await?;

        tracing::info!(username = %created.username, "account created");
        Ok(created)
    }

    /// Replaces an existing account.
    ///
    /// Without a new secret the stored hash and expiration are kept.
    pub async fn update_account(&self, input: AccountInput) -> AppResult<Account> {
        let password_hash = match input.password.as_deref() {
            Some(password) if !password.is_empty() => {
                Some(self.password_hasher.hash_password(password)?)
            }
            _ => None,
        };

        let updated = self
            .write("update_account", move |state| {
                let previous = state.users.get(&input.username).ok_or_else(|| {
                    AppError::NotFound(format!("account '{}' not found", input.username))
                })?;
                validate_role_references(state, &input.roles)?;

                let (password_hash, pwd_expiration_date) = match password_hash {
                    Some(hash) => (hash, input.pwd_expiration_date),
                    None => (
                        previous.password_hash.clone(),
                        previous.pwd_expiration_date,
                    ),
                };

                let account = Account {
                    username: input.username,
                    roles: input.roles,
                    password_hash,
                    name: input.name,
                    email: input.email,
                    last_update: now_unix(),
                    enabled: input.enabled,
                    pwd_expiration_date,
                    pwd_update_required: input.pwd_update_required,
                };
                state
                    .users
                    .insert(account.username.clone(), account.clone());
                Ok(account)
            })
            .await?;

        tracing::info!(username = %updated.username, "account updated");
        Ok(updated)
    }

    /// Deletes an account. Deleting a missing account still persists.
    pub async fn delete_account(&self, username: &str) -> AppResult<()> {
        let key = username.to_owned();
        self.write("delete_account", move |state| {
            state.users.remove(&key);
            Ok(())
        })
        .await?;

        tracing::info!(username = %username, "account deleted");
        Ok(())
    }

    /// Rotates the secret of an account after verifying the current one.
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if new_password.is_empty() {
            return Err(AppError::InvalidArgument("new password is empty".to_owned()));
        }

        let key = username.to_owned();
        let current_password = current_password.to_owned();
        let new_password = new_password.to_owned();
        let password_hasher = Arc::clone(&self.password_hasher);

        self.write("change_password", move |state| {
            let account = state
                .users
                .get_mut(&key)
                .ok_or_else(|| AppError::NotFound(format!("account '{key}' not found")))?;

            if !password_hasher.verify_password(&current_password, &account.password_hash)? {
                return Err(AppError::Unauthenticated(
                    "current password is incorrect".to_owned(),
                ));
            }

            let new_hash = password_hasher.hash_password(&new_password)?;
            account.password_hash = new_hash;
            account.pwd_update_required = false;
            account.last_update = now_unix();
            Ok(())
        })
        .await?;

        tracing::info!(username = %username, "account password changed");
        Ok(())
    }

    /// Returns the account when it exists, is enabled and the secret
    /// verifies. Every failure collapses into one generic error.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> AppResult<Account> {
        let rejected = || AppError::Unauthenticated("invalid username or password".to_owned());

        let account = self
            .state
            .read()
            .await
            .users
            .get(username)
            .cloned()
            .ok_or_else(rejected)?;

        if !account.enabled {
            return Err(rejected());
        }
        if !self
            .password_hasher
            .verify_password(password, &account.password_hash)?
        {
            return Err(rejected());
        }

        Ok(account)
    }
}

fn validate_role_references(state: &AccessState, roles: &[String]) -> AppResult<()> {
    for role in roles {
        if find_system_role(role).is_none() && !state.roles.contains_key(role) {
            return Err(AppError::InvalidArgument(format!("role '{role}' not found")));
        }
    }

    Ok(())
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
