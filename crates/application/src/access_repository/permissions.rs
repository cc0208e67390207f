use keyward_domain::{ScopePermissions, find_system_role, merge_role_grants};

use super::*;

impl AccessRepository {
    /// Resolves the merged grants of every role an account holds.
    ///
    /// Unknown and disabled accounts hold no permissions. Role names that no
    /// longer resolve are skipped.
    pub async fn effective_permissions(&self, username: &str) -> ScopePermissions {
        let state = self.state.read().await;
        let Some(account) = state.users.get(username).filter(|account| account.enabled) else {
            return ScopePermissions::new();
        };

        let roles = account
            .roles
            .iter()
            .filter_map(|name| state.roles.get(name).or_else(|| find_system_role(name)));
        merge_role_grants(roles)
    }
}
