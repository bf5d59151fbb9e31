use crate::graph::{DerivedNode, NodeId};
use async_trait::async_trait;
use std::sync::Arc;
use tapdesk_core::backend::DirectoryBackend;
use tapdesk_core::role::RoleQuery;
use tapdesk_core::{Group, Result, Session};

/// Resolves the support groups of the session's user.
///
/// Two sequential queries: the user's non-system roles, then the groups
/// pointing at those roles. Both are reissued on every recomputation.
/// The role set can change between the two reads; the result is not a
/// consistent snapshot in that case.
pub struct MembershipNode {
    backend: Arc<dyn DirectoryBackend>,
}

impl MembershipNode {
    pub fn new(backend: Arc<dyn DirectoryBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DerivedNode for MembershipNode {
    type Upstream = Option<Arc<Session>>;
    /// Sorted by group id, without duplicates.
    type Output = Vec<Group>;

    const ID: NodeId = NodeId::Membership;

    async fn compute(&self, session: Self::Upstream) -> Result<Self::Output> {
        let Some(session) = session else {
            return Ok(Vec::new());
        };

        let roles = self
            .backend
            .find_roles(&session, &RoleQuery::group_roles_of(session.user_id()))
            .await?;
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let role_ids: Vec<String> = roles.into_iter().map(|role| role.id).collect();
        let mut groups = self
            .backend
            .find_groups_by_roles(&session, &role_ids)
            .await?;

        groups.sort_by(|a, b| a.id.cmp(&b.id));
        groups.dedup_by(|a, b| a.id == b.id);

        tracing::debug!(
            "[Membership] user {} belongs to {} group(s)",
            session.user_id(),
            groups.len()
        );
        Ok(groups)
    }
}
