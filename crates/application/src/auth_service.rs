//! Login, logout and token check flows.

use std::sync::Arc;

use keyward_core::AppResult;
use keyward_domain::ScopePermissions;

use crate::{AccessRepository, TokenClaimsGate, TokenIssuer};

#[cfg(test)]
mod tests;

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// Token expiry as unix seconds.
    pub expires_at: i64,
    /// Authenticated username.
    pub username: String,
    /// Whether the caller must rotate the secret.
    pub pwd_update_required: bool,
    /// When the secret expires, if ever.
    pub pwd_expiration_date: Option<i64>,
    /// Effective permissions at login time.
    pub permissions: ScopePermissions,
}

/// Token check result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenCheck {
    /// Whether the token authenticates a caller.
    pub valid: bool,
    /// Resolved username when valid.
    pub username: Option<String>,
    /// Resolved permissions when valid.
    pub permissions: ScopePermissions,
}

/// Application service for the authentication entry points.
#[derive(Clone)]
pub struct AuthService {
    repository: AccessRepository,
    token_issuer: Arc<dyn TokenIssuer>,
    gate: TokenClaimsGate,
}

impl AuthService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        repository: AccessRepository,
        token_issuer: Arc<dyn TokenIssuer>,
        gate: TokenClaimsGate,
    ) -> Self {
        Self {
            repository,
            token_issuer,
            gate,
        }
    }

    /// Verifies credentials and issues a bearer token.
    ///
    /// Unknown accounts, disabled accounts and wrong secrets all fail with
    /// the same unauthenticated error.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let account = self
            .repository
            .verify_credentials(username, password)
            .await
            .inspect_err(|_| {
                tracing::info!(username = %username, "login rejected");
            })?;

        let issued = self.token_issuer.issue(&account.username).await?;
        let permissions = self.repository.effective_permissions(&account.username).await;
        tracing::info!(username = %account.username, "login succeeded");

        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.expires_at,
            username: account.username,
            pwd_update_required: account.pwd_update_required,
            pwd_expiration_date: account.pwd_expiration_date,
            permissions,
        })
    }

    /// Revokes the caller's bearer token.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.token_issuer.revoke(token).await
    }

    /// Reports whether a token currently authenticates a caller.
    pub async fn check(&self, token: &str) -> TokenCheck {
        match self.gate.resolve(token).await {
            Ok(context) => TokenCheck {
                valid: true,
                username: context.username().map(str::to_owned),
                permissions: context.permissions().clone(),
            },
            Err(error) => {
                tracing::debug!(error = %error, "token check failed");
                TokenCheck::default()
            }
        }
    }
}
