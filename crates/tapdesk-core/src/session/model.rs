//! Session domain model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An authenticated session: the credential plus the user record it belongs to.
///
/// Sessions are created by a successful login or restore and are always
/// replaced wholesale. Nothing in the client core mutates a session in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque token sent as `X-LC-Session` on authenticated requests
    pub session_token: String,
    /// The user record returned alongside the token
    pub user: SessionUser,
}

/// The user record carried by a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend object id of the user
    #[serde(rename = "objectId")]
    pub id: String,
    /// Login name
    pub username: String,
    /// Optional display name; may be missing or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Every other attribute of the user record (e.g. `wechatEnterpriseUserId`)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Session {
    /// Creates a session for the given token and user.
    pub fn new(session_token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            session_token: session_token.into(),
            user,
        }
    }

    /// Returns the id of the session's user.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

impl SessionUser {
    /// Creates a user record without a display name or custom attributes.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            name: None,
            attributes: Map::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns a custom attribute of the user record.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Lightweight identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub display_name: String,
}

impl CurrentUser {
    /// Projects a session onto its identity.
    ///
    /// The display name falls back to the username when the user has no
    /// display name or an empty one.
    pub fn from_session(session: &Session) -> Self {
        let display_name = session
            .user
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&session.user.username)
            .to_string();

        Self {
            id: session.user.id.clone(),
            display_name,
        }
    }
}
