use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A backend role record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "objectId")]
    pub id: String,
    pub name: String,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the system role this record represents, if any.
    pub fn system_role(&self) -> Option<SystemRole> {
        self.name.parse().ok()
    }
}

/// Built-in role names, distinct from user-defined group roles.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SystemRole {
    CustomerService,
    Staff,
    Admin,
    Collaborator,
}

impl SystemRole {
    /// Every system role. Roles with these names never resolve to groups.
    pub const ALL: [SystemRole; 4] = [
        SystemRole::CustomerService,
        SystemRole::Staff,
        SystemRole::Admin,
        SystemRole::Collaborator,
    ];

    /// The system roles surfaced as role flags.
    pub const FLAGGED: [SystemRole; 3] = [
        SystemRole::CustomerService,
        SystemRole::Staff,
        SystemRole::Admin,
    ];

    /// Backend names of `roles`.
    pub fn names(roles: &[SystemRole]) -> Vec<String> {
        roles.iter().map(|role| role.to_string()).collect()
    }
}

/// The set of system roles held by the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags(BTreeSet<SystemRole>);

impl RoleFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the system roles among `roles`; other role names are ignored.
    pub fn from_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Self {
        Self(roles.into_iter().filter_map(Role::system_role).collect())
    }

    pub fn contains(&self, role: SystemRole) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SystemRole> + '_ {
        self.0.iter().copied()
    }

    pub fn is_admin(&self) -> bool {
        self.contains(SystemRole::Admin)
    }

    /// Admins are always treated as customer service.
    pub fn is_customer_service(&self) -> bool {
        self.contains(SystemRole::CustomerService) || self.is_admin()
    }
}

impl FromIterator<SystemRole> for RoleFlags {
    fn from_iter<I: IntoIterator<Item = SystemRole>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
