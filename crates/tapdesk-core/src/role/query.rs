use super::SystemRole;

/// Name filter of a role query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NameFilter {
    #[default]
    Any,
    In(Vec<String>),
    NotIn(Vec<String>),
}

/// A role lookup: by name set and/or by attached user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleQuery {
    pub names: NameFilter,
    pub user_id: Option<String>,
}

impl RoleQuery {
    /// Roles attached to `user_id` that back support groups.
    pub fn group_roles_of(user_id: impl Into<String>) -> Self {
        Self {
            names: NameFilter::NotIn(SystemRole::names(&SystemRole::ALL)),
            user_id: Some(user_id.into()),
        }
    }

    /// Flagged system roles attached to `user_id`.
    pub fn system_roles_of(user_id: impl Into<String>) -> Self {
        Self {
            names: NameFilter::In(SystemRole::names(&SystemRole::FLAGGED)),
            user_id: Some(user_id.into()),
        }
    }

    /// Returns whether a role with `name` attached to `user_id` satisfies the query.
    pub fn matches(&self, name: &str, user_id: Option<&str>) -> bool {
        let name_ok = match &self.names {
            NameFilter::Any => true,
            NameFilter::In(names) => names.iter().any(|n| n == name),
            NameFilter::NotIn(names) => names.iter().all(|n| n != name),
        };
        let user_ok = match &self.user_id {
            Some(expected) => user_id == Some(expected.as_str()),
            None => true,
        };
        name_ok && user_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_roles_exclude_every_system_role() {
        let query = RoleQuery::group_roles_of("u1");
        assert!(query.matches("billing", Some("u1")));
        assert!(!query.matches("collaborator", Some("u1")));
        assert!(!query.matches("admin", Some("u1")));
        assert!(!query.matches("billing", Some("u2")));
    }

    #[test]
    fn test_system_roles_skip_collaborator() {
        let query = RoleQuery::system_roles_of("u1");
        assert!(query.matches("staff", Some("u1")));
        assert!(!query.matches("collaborator", Some("u1")));
    }
}
