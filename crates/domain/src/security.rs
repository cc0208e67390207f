use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use keyward_core::AppError;
use serde::{Deserialize, Serialize};

/// Scope-to-permission grants, deduplicated and canonically ordered.
pub type ScopePermissions = BTreeMap<Scope, BTreeSet<Permission>>;

/// Category of administrable resources in which permissions are granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Cluster hosts.
    Hosts,
    /// Cluster configuration options.
    ConfigOpt,
    /// Storage pools.
    Pool,
    /// Object storage daemons.
    Osd,
    /// Monitors.
    Monitor,
    /// Block device images.
    RbdImage,
    /// iSCSI gateways.
    Iscsi,
    /// Block device mirroring.
    RbdMirroring,
    /// Object gateway.
    Rgw,
    /// Shared filesystems.
    Cephfs,
    /// Manager daemons and modules.
    Manager,
    /// Cluster logs.
    Log,
    /// Grafana dashboards.
    Grafana,
    /// Prometheus alerting.
    Prometheus,
    /// Accounts and roles.
    User,
    /// Dashboard settings.
    DashboardSettings,
    /// NFS exports.
    NfsGanesha,
    /// NVMe over fabrics gateways.
    NvmeOf,
}

impl Scope {
    /// Returns the stable transport value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hosts => "hosts",
            Self::ConfigOpt => "config-opt",
            Self::Pool => "pool",
            Self::Osd => "osd",
            Self::Monitor => "monitor",
            Self::RbdImage => "rbd-image",
            Self::Iscsi => "iscsi",
            Self::RbdMirroring => "rbd-mirroring",
            Self::Rgw => "rgw",
            Self::Cephfs => "cephfs",
            Self::Manager => "manager",
            Self::Log => "log",
            Self::Grafana => "grafana",
            Self::Prometheus => "prometheus",
            Self::User => "user",
            Self::DashboardSettings => "dashboard-settings",
            Self::NfsGanesha => "nfs-ganesha",
            Self::NvmeOf => "nvme-of",
        }
    }

    /// Returns all known scopes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Scope] = &[
            Scope::Hosts,
            Scope::ConfigOpt,
            Scope::Pool,
            Scope::Osd,
            Scope::Monitor,
            Scope::RbdImage,
            Scope::Iscsi,
            Scope::RbdMirroring,
            Scope::Rgw,
            Scope::Cephfs,
            Scope::Manager,
            Scope::Log,
            Scope::Grafana,
            Scope::Prometheus,
            Scope::User,
            Scope::DashboardSettings,
            Scope::NfsGanesha,
            Scope::NvmeOf,
        ];

        ALL
    }

    /// Parses a transport value into a scope.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Scope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|scope| scope.as_str() == value)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::all().iter().map(Self::as_str).collect();
                AppError::InvalidArgument(format!(
                    "unknown scope '{value}', valid values: {}",
                    valid.join(", ")
                ))
            })
    }
}

impl Display for Scope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Action grantable within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows reading resources.
    Read,
    /// Allows creating resources.
    Create,
    /// Allows updating resources.
    Update,
    /// Allows deleting resources.
    Delete,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::Read,
            Permission::Create,
            Permission::Update,
            Permission::Delete,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::InvalidArgument(format!(
                "unknown permission '{value}', valid values: read, create, update, delete"
            ))),
        }
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Parses raw transport grants into validated scope permissions.
///
/// Every key must be a known scope and every value a known permission.
/// Duplicate permissions within a scope collapse.
pub fn parse_scope_permissions<'a, I, P>(raw: I) -> Result<ScopePermissions, AppError>
where
    I: IntoIterator<Item = (&'a str, P)>,
    P: IntoIterator<Item = &'a str>,
{
    let mut parsed = ScopePermissions::new();
    for (scope, permissions) in raw {
        let scope = Scope::from_transport(scope)?;
        let entry = parsed.entry(scope).or_default();
        for permission in permissions {
            entry.insert(Permission::from_transport(permission)?);
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Permission, Scope, parse_scope_permissions};

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in Permission::all() {
            let restored = Permission::from_str(permission.as_str());
            assert_eq!(restored.ok(), Some(*permission));
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(Permission::from_str("execute").is_err());
    }

    #[test]
    fn scope_transport_values_match_serde_names() {
        for scope in Scope::all() {
            let serialized = serde_json::to_string(scope).unwrap_or_default();
            assert_eq!(serialized, format!("\"{}\"", scope.as_str()));
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        assert!(Scope::from_str("dashboard-setting").is_err());
    }

    #[test]
    fn parse_scope_permissions_deduplicates_values() {
        let parsed = parse_scope_permissions([("pool", vec!["read", "read", "update"])]);
        let parsed = parsed.unwrap_or_default();
        let pool: Vec<Permission> = parsed
            .get(&Scope::Pool)
            .map(|values| values.iter().copied().collect())
            .unwrap_or_default();
        assert_eq!(pool, vec![Permission::Read, Permission::Update]);
    }

    #[test]
    fn parse_scope_permissions_rejects_unknown_scope() {
        let parsed = parse_scope_permissions([("cluster", vec!["read"])]);
        assert!(parsed.is_err());
    }
}
