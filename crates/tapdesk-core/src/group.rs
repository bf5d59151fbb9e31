//! Support group domain model.

use crate::permission::PartialPermissions;
use serde::{Deserialize, Serialize};

/// A support group. Membership is expressed through the backend role the
/// group points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Id of the `_Role` record whose users belong to this group
    pub role_id: String,
    /// Grants OR-ed into the members' effective permissions
    #[serde(default)]
    pub permissions: PartialPermissions,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role_id: role_id.into(),
            permissions: PartialPermissions::default(),
        }
    }

    pub fn with_permissions(mut self, permissions: PartialPermissions) -> Self {
        self.permissions = permissions;
        self
    }
}
