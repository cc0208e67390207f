//! Built-in roles shipped with the system.
//!
//! The catalogue is a constant table; callers only get read-only lookups.

use std::sync::LazyLock;

use crate::{Permission, RoleDefinition, Scope};

const FULL: &[Permission] = &[
    Permission::Read,
    Permission::Create,
    Permission::Update,
    Permission::Delete,
];
const READ: &[Permission] = &[Permission::Read];

struct SystemRoleEntry {
    name: &'static str,
    description: &'static str,
    grants: &'static [(Scope, &'static [Permission])],
}

const SYSTEM_ROLES: &[SystemRoleEntry] = &[
    SystemRoleEntry {
        name: "administrator",
        description: "allows full permissions for all security scopes",
        grants: &[
            (Scope::Cephfs, FULL),
            (Scope::ConfigOpt, FULL),
            (Scope::DashboardSettings, FULL),
            (Scope::Grafana, FULL),
            (Scope::Hosts, FULL),
            (Scope::Iscsi, FULL),
            (Scope::Log, FULL),
            (Scope::Manager, FULL),
            (Scope::Monitor, FULL),
            (Scope::NfsGanesha, FULL),
            (Scope::Osd, FULL),
            (Scope::Pool, FULL),
            (Scope::Prometheus, FULL),
            (Scope::RbdImage, FULL),
            (Scope::RbdMirroring, FULL),
            (Scope::Rgw, FULL),
            (Scope::User, FULL),
        ],
    },
    SystemRoleEntry {
        name: "block-manager",
        description: "allows full permissions for rbd-image, rbd-mirroring, and iscsi scopes",
        grants: &[
            (Scope::RbdImage, FULL),
            (Scope::Pool, READ),
            (Scope::Iscsi, FULL),
            (Scope::RbdMirroring, FULL),
            (Scope::Grafana, READ),
        ],
    },
    SystemRoleEntry {
        name: "cephfs-manager",
        description: "allows full permissions for the cephfs scope",
        grants: &[(Scope::Cephfs, FULL), (Scope::Grafana, READ)],
    },
    SystemRoleEntry {
        name: "cluster-manager",
        description: "allows full permissions for the hosts, osd, mon, mgr, and config-opt scopes",
        grants: &[
            (Scope::Hosts, FULL),
            (Scope::Osd, FULL),
            (Scope::Monitor, FULL),
            (Scope::Manager, FULL),
            (Scope::ConfigOpt, FULL),
            (Scope::Log, FULL),
            (Scope::Grafana, READ),
        ],
    },
    SystemRoleEntry {
        name: "ganesha-manager",
        description: "allows full permissions for the nfs-ganesha scope",
        grants: &[
            (Scope::NfsGanesha, FULL),
            (Scope::Cephfs, FULL),
            (Scope::Rgw, FULL),
            (Scope::Grafana, READ),
        ],
    },
    SystemRoleEntry {
        name: "pool-manager",
        description: "allows full permissions for the pool scope",
        grants: &[(Scope::Pool, FULL), (Scope::Grafana, READ)],
    },
    SystemRoleEntry {
        name: "read-only",
        description: "allows read permission for all security scope except dashboard settings and config-opt",
        grants: &[
            (Scope::Cephfs, READ),
            (Scope::Grafana, READ),
            (Scope::Hosts, READ),
            (Scope::Iscsi, READ),
            (Scope::Log, READ),
            (Scope::Manager, READ),
            (Scope::Monitor, READ),
            (Scope::NfsGanesha, READ),
            (Scope::Osd, READ),
            (Scope::Pool, READ),
            (Scope::Prometheus, READ),
            (Scope::RbdImage, READ),
            (Scope::RbdMirroring, READ),
            (Scope::Rgw, READ),
            (Scope::User, READ),
        ],
    },
    SystemRoleEntry {
        name: "rgw-manager",
        description: "allows full permissions for the rgw scope",
        grants: &[(Scope::Rgw, FULL), (Scope::Grafana, READ)],
    },
];

static CATALOGUE: LazyLock<Vec<RoleDefinition>> = LazyLock::new(|| {
    SYSTEM_ROLES
        .iter()
        .map(|spec| RoleDefinition::system(spec.name, spec.description, spec.grants))
        .collect()
});

/// Returns every system role in catalogue order.
#[must_use]
pub fn system_roles() -> &'static [RoleDefinition] {
    CATALOGUE.as_slice()
}

/// Looks up a system role by name.
#[must_use]
pub fn find_system_role(name: &str) -> Option<&'static RoleDefinition> {
    CATALOGUE.iter().find(|role| role.name() == name)
}

/// Returns whether the name belongs to the system role universe.
#[must_use]
pub fn is_system_role(name: &str) -> bool {
    find_system_role(name).is_some()
}
