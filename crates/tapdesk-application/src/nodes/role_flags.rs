use crate::graph::{DerivedNode, NodeId};
use async_trait::async_trait;
use std::sync::Arc;
use tapdesk_core::backend::DirectoryBackend;
use tapdesk_core::role::RoleQuery;
use tapdesk_core::{Result, RoleFlags, Session};

/// Resolves the system roles held by the session's user.
///
/// Depends on the session only, never on group membership.
pub struct RoleFlagsNode {
    backend: Arc<dyn DirectoryBackend>,
}

impl RoleFlagsNode {
    pub fn new(backend: Arc<dyn DirectoryBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DerivedNode for RoleFlagsNode {
    type Upstream = Option<Arc<Session>>;
    type Output = RoleFlags;

    const ID: NodeId = NodeId::RoleFlags;

    async fn compute(&self, session: Self::Upstream) -> Result<Self::Output> {
        let Some(session) = session else {
            return Ok(RoleFlags::new());
        };

        let roles = self
            .backend
            .find_roles(&session, &RoleQuery::system_roles_of(session.user_id()))
            .await?;
        Ok(RoleFlags::from_roles(&roles))
    }
}
