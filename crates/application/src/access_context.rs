//! Request-scoped authorization context.

use keyward_core::{AppError, AppResult, UserIdentity};
use keyward_domain::{Permission, Scope, ScopePermissions};

/// Immutable identity and permission snapshot attached to one request.
///
/// Built once by the token gate; handlers check it without going back to
/// the repository.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessContext {
    identity: Option<UserIdentity>,
    permissions: ScopePermissions,
}

impl AccessContext {
    /// Context for operations that bypass authentication.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an authenticated caller.
    #[must_use]
    pub fn authenticated(identity: UserIdentity, permissions: ScopePermissions) -> Self {
        Self {
            identity: Some(identity),
            permissions,
        }
    }

    /// Returns the caller username, if authenticated.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(UserIdentity::username)
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &ScopePermissions {
        &self.permissions
    }

    /// Requires every listed permission in the scope.
    pub fn require(&self, scope: Scope, required: &[Permission]) -> AppResult<()> {
        let granted = self.permissions.get(&scope);
        let allowed = granted
            .is_some_and(|granted| required.iter().all(|permission| granted.contains(permission)));

        if !allowed {
            tracing::debug!(
                username = self.username().unwrap_or("<anonymous>"),
                scope = %scope,
                "permission check failed"
            );
            return Err(AppError::AccessDenied(
                "insufficient permissions".to_owned(),
            ));
        }

        Ok(())
    }

    /// Requires the caller to be the named account.
    pub fn require_self(&self, username: &str) -> AppResult<()> {
        if self.username() != Some(username) {
            return Err(AppError::AccessDenied(
                "operation is limited to the caller's own account".to_owned(),
            ));
        }

        Ok(())
    }
}
