//! Collaborator interfaces of the hosted backend.
//!
//! The client core never talks HTTP itself. Authentication, directory
//! queries and cloud function calls go through these traits so the
//! transport can be swapped (LeanCloud REST client, in-memory fakes).

use crate::error::Result;
use crate::group::Group;
use crate::role::{Role, RoleQuery};
use crate::session::Session;
use async_trait::async_trait;
use serde_json::Value;

/// Authentication collaborator.
///
/// Every successful call hands back a complete `Session`; callers are
/// responsible for committing it to the session store.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Logs in with username and password.
    async fn login(&self, username: &str, password: &str) -> Result<Session>;

    /// Restores a session from a previously issued token.
    ///
    /// Also used to re-fetch the user record of a live session.
    async fn become_user(&self, session_token: &str) -> Result<Session>;

    /// Invalidates `session_token` on the backend.
    async fn logout(&self, session_token: &str) -> Result<()>;
}

/// Read access to roles and support groups.
///
/// Both operations are eventually consistent, may fail transiently and
/// return unordered result sets. Queries run with the credentials of
/// `session`.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    /// Finds roles matching `query`.
    async fn find_roles(&self, session: &Session, query: &RoleQuery) -> Result<Vec<Role>>;

    /// Finds the groups whose role reference is one of `role_ids`.
    async fn find_groups_by_roles(&self, session: &Session, role_ids: &[String])
    -> Result<Vec<Group>>;
}

/// Serverless function invocation.
#[async_trait]
pub trait CloudFunctions: Send + Sync {
    /// Runs the cloud function `name` with JSON `params` and returns its result.
    async fn run(&self, name: &str, params: Value) -> Result<Value>;
}
