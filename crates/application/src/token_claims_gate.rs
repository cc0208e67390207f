//! Bearer token authentication gate.
//!
//! Turns an inbound `Authorization` header into an [`AccessContext`]. Every
//! failure surfaces as the same unauthenticated error; the failing stage is
//! only visible in logs.

use std::collections::HashSet;
use std::sync::Arc;

use keyward_core::{AppError, AppResult, UserIdentity};

use crate::{AccessContext, AccessRepository, TokenIntrospector, TokenVerifier};

#[cfg(test)]
mod tests;

const DEFAULT_BYPASS_OPERATIONS: [&str; 2] = ["login", "check"];

/// Authentication gate run before every remote operation.
#[derive(Clone)]
pub struct TokenClaimsGate {
    introspector: Arc<dyn TokenIntrospector>,
    verifier: Arc<dyn TokenVerifier>,
    repository: AccessRepository,
    bypass_operations: HashSet<String>,
}

impl TokenClaimsGate {
    /// Creates a gate that lets `login` and `check` through unauthenticated.
    #[must_use]
    pub fn new(
        introspector: Arc<dyn TokenIntrospector>,
        verifier: Arc<dyn TokenVerifier>,
        repository: AccessRepository,
    ) -> Self {
        Self {
            introspector,
            verifier,
            repository,
            bypass_operations: DEFAULT_BYPASS_OPERATIONS
                .iter()
                .map(|operation| (*operation).to_owned())
                .collect(),
        }
    }

    /// Replaces the set of operations that skip authentication.
    #[must_use]
    pub fn with_bypass_operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bypass_operations = operations.into_iter().map(Into::into).collect();
        self
    }

    /// Returns whether the operation skips authentication.
    #[must_use]
    pub fn is_bypassed(&self, operation: &str) -> bool {
        self.bypass_operations.contains(operation)
    }

    /// Authenticates one inbound call.
    pub async fn authenticate(
        &self,
        operation: &str,
        authorization: Option<&str>,
    ) -> AppResult<AccessContext> {
        if self.is_bypassed(operation) {
            return Ok(AccessContext::anonymous());
        }

        let token = extract_bearer_token(authorization).inspect_err(|_| {
            tracing::debug!(operation, stage = "extraction", "authentication failed");
        })?;
        self.resolve(token).await
    }

    /// Resolves a raw bearer token into a request context.
    pub async fn resolve(&self, token: &str) -> AppResult<AccessContext> {
        let subject = self.introspector.introspect(token).await.map_err(|error| {
            tracing::debug!(stage = "introspection", error = %error, "authentication failed");
            unauthenticated()
        })?;

        let claims = self.verifier.verify(token).map_err(|error| {
            tracing::warn!(stage = "signature", error = %error, "authentication failed");
            unauthenticated()
        })?;
        if claims.subject != subject {
            tracing::warn!(
                stage = "signature",
                introspected = %subject,
                verified = %claims.subject,
                "token subject mismatch"
            );
            return Err(unauthenticated());
        }

        let account = self
            .repository
            .get_account(&subject)
            .await
            .ok()
            .filter(|account| account.enabled)
            .ok_or_else(|| {
                tracing::warn!(
                    stage = "subject",
                    username = %subject,
                    "token subject is unknown or disabled"
                );
                unauthenticated()
            })?;

        let permissions = self.repository.effective_permissions(&account.username).await;
        let identity = UserIdentity::new(account.username, account.name, account.email);
        Ok(AccessContext::authenticated(identity, permissions))
    }
}

/// Extracts the credential from a `Bearer` authorization header value.
///
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(authorization: Option<&str>) -> AppResult<&str> {
    let value = authorization.ok_or_else(unauthenticated)?;
    let (scheme, token) = value.trim().split_once(' ').ok_or_else(unauthenticated)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(unauthenticated());
    }

    Ok(token)
}

fn unauthenticated() -> AppError {
    AppError::Unauthenticated("invalid or missing credentials".to_owned())
}
