use crate::graph::{DerivedNode, NodeId};
use async_trait::async_trait;
use std::sync::Arc;
use tapdesk_core::{CurrentUser, Result, Session};

/// Projects the session onto the logged-in user's identity. No backend call.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNode;

#[async_trait]
impl DerivedNode for IdentityNode {
    type Upstream = Option<Arc<Session>>;
    type Output = Option<CurrentUser>;

    const ID: NodeId = NodeId::Identity;

    async fn compute(&self, session: Self::Upstream) -> Result<Self::Output> {
        Ok(session.as_deref().map(CurrentUser::from_session))
    }
}
