//! `where` filters of LeanCloud class queries.

use serde_json::{Map, Value, json};
use tapdesk_core::role::{NameFilter, RoleQuery};

pub const USER_CLASS: &str = "_User";
pub const ROLE_CLASS: &str = "_Role";

/// A pointer to an object of `class_name`.
pub fn pointer(class_name: &str, object_id: &str) -> Value {
    json!({
        "__type": "Pointer",
        "className": class_name,
        "objectId": object_id,
    })
}

/// Filter of a `/1.1/roles` query.
///
/// `users` is a relation; equality against a user pointer selects the
/// roles whose relation contains that user.
pub fn role_filter(query: &RoleQuery) -> Value {
    let mut filter = Map::new();
    match &query.names {
        NameFilter::Any => {}
        NameFilter::In(names) => {
            filter.insert("name".to_string(), json!({ "$in": names }));
        }
        NameFilter::NotIn(names) => {
            filter.insert("name".to_string(), json!({ "$nin": names }));
        }
    }
    if let Some(user_id) = &query.user_id {
        filter.insert("users".to_string(), pointer(USER_CLASS, user_id));
    }
    Value::Object(filter)
}

/// Filter selecting the groups whose `role` pointer is one of `role_ids`.
pub fn groups_by_roles_filter(role_ids: &[String]) -> Value {
    let pointers: Vec<Value> = role_ids
        .iter()
        .map(|id| pointer(ROLE_CLASS, id))
        .collect();
    json!({ "role": { "$in": pointers } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_role_filter_excludes_system_names() {
        let filter = role_filter(&RoleQuery::group_roles_of("u1"));
        assert_eq!(
            filter,
            json!({
                "name": { "$nin": ["customerService", "staff", "admin", "collaborator"] },
                "users": { "__type": "Pointer", "className": "_User", "objectId": "u1" },
            })
        );
    }

    #[test]
    fn test_system_role_filter_uses_in() {
        let filter = role_filter(&RoleQuery::system_roles_of("u2"));
        assert_eq!(
            filter["name"],
            json!({ "$in": ["customerService", "staff", "admin"] })
        );
    }

    #[test]
    fn test_unfiltered_role_query_is_empty() {
        assert_eq!(role_filter(&RoleQuery::default()), json!({}));
    }

    #[test]
    fn test_group_filter_points_at_roles() {
        let filter = groups_by_roles_filter(&["r1".to_string(), "r2".to_string()]);
        let pointers = filter["role"]["$in"].as_array().unwrap();
        assert_eq!(pointers.len(), 2);
        assert_eq!(pointers[1]["className"], "_Role");
        assert_eq!(pointers[1]["objectId"], "r2");
    }
}
