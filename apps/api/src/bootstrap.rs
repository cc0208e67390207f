use keyward_application::{AccessRepository, AccountInput};
use keyward_core::{AppError, AppResult};

use crate::api_config::AdminBootstrapConfig;

const ADMIN_ROLE: &str = "administrator";
const ADMIN_DISPLAY_NAME: &str = "default administrator";

/// Creates the configured administrator, or resets it when it exists.
pub async fn ensure_admin_account(
    repository: &AccessRepository,
    admin: &AdminBootstrapConfig,
) -> AppResult<()> {
    let input = AccountInput {
        username: admin.username.clone(),
        password: Some(admin.password.clone()),
        name: Some(ADMIN_DISPLAY_NAME.to_owned()),
        email: None,
        enabled: true,
        roles: vec![ADMIN_ROLE.to_owned()],
        pwd_expiration_date: None,
        pwd_update_required: false,
    };

    match repository.get_account(&admin.username).await {
        Ok(existing) => {
            repository
                .update_account(AccountInput {
                    email: existing.email,
                    ..input
                })
                .await?;
            tracing::info!(username = %admin.username, "default administrator updated");
        }
        Err(AppError::NotFound(_)) => {
            repository.create_account(input).await?;
            tracing::info!(username = %admin.username, "default administrator created");
        }
        Err(error) => return Err(error),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use keyward_application::{AccessRepository, AccountInput, PasswordHasher};
    use keyward_core::AppResult;
    use keyward_infrastructure::{Argon2PasswordHasher, InMemoryDocumentStore};

    use super::ensure_admin_account;
    use crate::api_config::AdminBootstrapConfig;

    async fn repository() -> AppResult<AccessRepository> {
        AccessRepository::load(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1)?),
        )
        .await
    }

    fn admin(password: &str) -> AdminBootstrapConfig {
        AdminBootstrapConfig {
            username: "admin".to_owned(),
            password: password.to_owned(),
        }
    }

    #[tokio::test]
    async fn missing_admin_is_created_with_administrator_role() -> AppResult<()> {
        let repository = repository().await?;

        ensure_admin_account(&repository, &admin("first")).await?;

        let account = repository.get_account("admin").await?;
        assert!(account.enabled);
        assert!(account.has_role("administrator"));
        assert!(repository.verify_credentials("admin", "first").await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn existing_admin_is_reset() -> AppResult<()> {
        let repository = repository().await?;
        repository
            .create_account(AccountInput {
                username: "admin".to_owned(),
                password: Some("old".to_owned()),
                email: Some("ops@example.com".to_owned()),
                enabled: false,
                roles: vec!["read-only".to_owned()],
                ..AccountInput::default()
            })
            .await?;

        ensure_admin_account(&repository, &admin("new")).await?;

        let account = repository.get_account("admin").await?;
        assert!(account.enabled);
        assert_eq!(account.roles, vec!["administrator".to_owned()]);
        assert_eq!(account.email.as_deref(), Some("ops@example.com"));
        assert!(Argon2PasswordHasher::new().verify_password("new", &account.password_hash)?);
        Ok(())
    }
}
