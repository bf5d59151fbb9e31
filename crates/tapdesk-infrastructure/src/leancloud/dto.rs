//! Wire shapes of LeanCloud REST responses.
//!
//! These are kept apart from the domain types so the backend's field names
//! (`objectId`, role pointers, `results`) never leak into the client core.

use serde::{Deserialize, Serialize};
use tapdesk_core::{Group, PartialPermissions, Role, Session, SessionUser};

/// Envelope of class and role queries.
#[derive(Debug, Deserialize)]
pub struct QueryResults<T> {
    pub results: Vec<T>,
}

/// Envelope of cloud function responses. A missing `result` is `null`.
#[derive(Debug, Deserialize)]
pub struct FunctionResult {
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Error body returned by the API, e.g. `{"code":211,"error":"Could not find user."}`.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<i64>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable text of the error.
    pub fn text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A user record carrying its session token (`/login`, `/users/me`).
#[derive(Debug, Deserialize)]
pub struct AuthenticatedUser {
    #[serde(rename = "sessionToken")]
    pub session_token: String,
    #[serde(flatten)]
    pub user: SessionUser,
}

impl From<AuthenticatedUser> for Session {
    fn from(dto: AuthenticatedUser) -> Self {
        Session::new(dto.session_token, dto.user)
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleRecord {
    #[serde(rename = "objectId")]
    pub object_id: String,
    pub name: String,
}

impl From<RoleRecord> for Role {
    fn from(dto: RoleRecord) -> Self {
        Role::new(dto.object_id, dto.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct PointerRef {
    #[serde(rename = "objectId")]
    pub object_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupRecord {
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(default)]
    pub name: String,
    pub role: PointerRef,
    /// Groups created before permissions existed have no such field.
    #[serde(default)]
    pub permissions: Option<PartialPermissions>,
}

impl From<GroupRecord> for Group {
    fn from(dto: GroupRecord) -> Self {
        Group::new(dto.object_id, dto.name, dto.role.object_id)
            .with_permissions(dto.permissions.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_record_maps_role_pointer() {
        let body = json!({
            "results": [{
                "objectId": "g1",
                "name": "Billing",
                "role": { "__type": "Pointer", "className": "_Role", "objectId": "r1" },
                "permissions": { "statistics": true },
                "createdAt": "2021-01-01T00:00:00.000Z"
            }, {
                "objectId": "g2",
                "name": "Legacy",
                "role": { "__type": "Pointer", "className": "_Role", "objectId": "r2" }
            }]
        });
        let parsed: QueryResults<GroupRecord> = serde_json::from_value(body).unwrap();
        let groups: Vec<Group> = parsed.results.into_iter().map(Group::from).collect();

        assert_eq!(groups[0].role_id, "r1");
        assert_eq!(groups[0].permissions.statistics, Some(true));
        assert_eq!(groups[0].permissions.view, None);
        assert_eq!(groups[1].permissions, PartialPermissions::default());
    }

    #[test]
    fn test_authenticated_user_splits_token_from_record() {
        let body = json!({
            "objectId": "u1",
            "username": "alice",
            "sessionToken": "tok",
            "email": "alice@example.com"
        });
        let session: Session = serde_json::from_value::<AuthenticatedUser>(body)
            .unwrap()
            .into();

        assert_eq!(session.session_token, "tok");
        assert_eq!(session.user_id(), "u1");
        assert!(session.user.attribute("sessionToken").is_none());
        assert_eq!(session.user.attribute("email"), Some(&json!("alice@example.com")));
    }

    #[test]
    fn test_error_text_prefers_error_field() {
        let body: ApiErrorBody =
            serde_json::from_value(json!({ "code": 211, "error": "Could not find user." }))
                .unwrap();
        assert_eq!(body.text(), Some("Could not find user."));

        let body: ApiErrorBody =
            serde_json::from_value(json!({ "message": "forbidden" })).unwrap();
        assert_eq!(body.text(), Some("forbidden"));
    }
}
