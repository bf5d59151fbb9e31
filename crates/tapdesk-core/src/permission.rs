//! Customer-service permissions and the group grant fold.
//!
//! Permissions are a closed record. Each group carries a partial map of
//! grants; the effective permissions of a user are the baseline OR-ed with
//! every grant of every group the user belongs to.

use serde::{Deserialize, Serialize};

/// Effective permissions of a customer-service user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub view: bool,
    pub ticket_list: bool,
    pub statistics: bool,
}

/// Permission grants carried by a group. Missing keys grant nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPermissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_list: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<bool>,
}

impl Default for Permissions {
    /// The baseline applied before any group grant.
    fn default() -> Self {
        Self {
            view: true,
            ticket_list: true,
            statistics: false,
        }
    }
}

impl Permissions {
    /// A record with every permission denied.
    pub const NONE: Permissions = Permissions {
        view: false,
        ticket_list: false,
        statistics: false,
    };

    /// OR-s the keys present in `grants` into `self`.
    pub fn merge(&mut self, grants: &PartialPermissions) {
        fn or_into(acc: &mut bool, grant: Option<bool>) {
            if let Some(grant) = grant {
                *acc = *acc || grant;
            }
        }

        or_into(&mut self.view, grants.view);
        or_into(&mut self.ticket_list, grants.ticket_list);
        or_into(&mut self.statistics, grants.statistics);
    }

    /// Folds every grant into `baseline`.
    ///
    /// The fold is total, commutative and associative: the order of `grants`
    /// never changes the result and no grant is skipped.
    pub fn fold<'a>(
        baseline: Permissions,
        grants: impl IntoIterator<Item = &'a PartialPermissions>,
    ) -> Permissions {
        grants.into_iter().fold(baseline, |mut acc, grant| {
            acc.merge(grant);
            acc
        })
    }
}

impl PartialPermissions {
    pub fn with_view(mut self, value: bool) -> Self {
        self.view = Some(value);
        self
    }

    pub fn with_ticket_list(mut self, value: bool) -> Self {
        self.ticket_list = Some(value);
        self
    }

    pub fn with_statistics(mut self, value: bool) -> Self {
        self.statistics = Some(value);
        self
    }
}
