//! Session/permission resolution graph.
//!
//! `SessionGraph` wires the session store to the four derived nodes:
//!
//! ```text
//! Session ──► Identity
//!    ├──────► Membership ──► Permissions
//!    └──────► RoleFlags  ──► is_admin / is_customer_service (projections)
//! ```
//!
//! Replacing the session invalidates every reachable node synchronously.
//! Values are recomputed lazily on the next read, or eagerly in the
//! background for nodes that have live subscriptions.

use crate::graph::{DependencyGraph, DerivedNode, Memo, NodeId, Subscription};
use crate::nodes::{IdentityNode, MembershipNode, PermissionsNode, RoleFlagsNode};
use crate::session_store::SessionStore;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tapdesk_core::backend::DirectoryBackend;
use tapdesk_core::{CurrentUser, Group, Permissions, Result, RoleFlags, Session};

struct NodeCell<N: DerivedNode> {
    node: Arc<N>,
    memo: Memo<N::Output>,
}

impl<N: DerivedNode> NodeCell<N> {
    fn new(node: N) -> Self {
        Self {
            node: Arc::new(node),
            memo: Memo::new(N::ID.into()),
        }
    }
}

struct GraphInner {
    edges: DependencyGraph,
    store: SessionStore,
    identity: NodeCell<IdentityNode>,
    membership: NodeCell<MembershipNode>,
    role_flags: NodeCell<RoleFlagsNode>,
    permissions: NodeCell<PermissionsNode>,
}

/// Handle to the session graph. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct SessionGraph {
    inner: Arc<GraphInner>,
}

impl SessionGraph {
    /// Creates a graph with no session.
    ///
    /// # Arguments
    ///
    /// * `backend` - Directory queries for membership and role flags
    /// * `baseline` - Permissions granted before any group grant
    pub fn new(backend: Arc<dyn DirectoryBackend>, baseline: Permissions) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(GraphInner {
                edges: DependencyGraph::new()?,
                store: SessionStore::default(),
                identity: NodeCell::new(IdentityNode),
                membership: NodeCell::new(MembershipNode::new(backend.clone())),
                role_flags: NodeCell::new(RoleFlagsNode::new(backend)),
                permissions: NodeCell::new(PermissionsNode::new(baseline)),
            }),
        })
    }

    // ============================================================================
    // Session store
    // ============================================================================

    /// The current session, `None` when logged out.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.inner.store.get()
    }

    /// Replaces the session and invalidates every node derived from it.
    ///
    /// Invalidation is unconditional, even when `session` equals the
    /// current one.
    pub fn set_session(&self, session: Option<Session>) {
        let affected = self.inner.edges.affected_by(NodeId::Session);
        let revision = self.inner.store.replace(session, || {
            for node in &affected {
                self.invalidate(*node);
            }
        });
        tracing::debug!(
            "[SessionGraph] session revision {} invalidated {:?}",
            revision,
            affected
        );

        for node in affected {
            if self.subscriber_count(node) > 0 {
                self.prefetch(node);
            }
        }
    }

    /// Number of session replacements so far.
    pub fn revision(&self) -> u64 {
        self.inner.store.revision()
    }

    /// Live generation of `node`; the store revision for the session node.
    pub fn generation(&self, node: NodeId) -> u64 {
        match node {
            NodeId::Session => self.revision(),
            NodeId::Identity => self.inner.identity.memo.generation(),
            NodeId::Membership => self.inner.membership.memo.generation(),
            NodeId::RoleFlags => self.inner.role_flags.memo.generation(),
            NodeId::Permissions => self.inner.permissions.memo.generation(),
        }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Identity of the logged-in user.
    pub async fn current_user(&self) -> Result<Option<CurrentUser>> {
        let user = self
            .evaluate(&self.inner.identity, Self::session_upstream)
            .await?;
        Ok((*user).clone())
    }

    /// Support groups of the logged-in user, sorted by id.
    pub async fn groups(&self) -> Result<Arc<Vec<Group>>> {
        self.evaluate(&self.inner.membership, Self::session_upstream)
            .await
    }

    /// Effective permissions of the logged-in user.
    pub async fn permissions(&self) -> Result<Permissions> {
        let permissions = self
            .evaluate(&self.inner.permissions, Self::membership_upstream)
            .await?;
        Ok(*permissions)
    }

    /// System roles held by the logged-in user.
    pub async fn roles(&self) -> Result<Arc<RoleFlags>> {
        self.evaluate(&self.inner.role_flags, Self::session_upstream)
            .await
    }

    pub async fn is_admin(&self) -> Result<bool> {
        Ok(self.roles().await?.is_admin())
    }

    /// Admins count as customer service.
    pub async fn is_customer_service(&self) -> Result<bool> {
        Ok(self.roles().await?.is_customer_service())
    }

    /// Reads `node`, discarding the value.
    pub async fn refresh(&self, node: NodeId) -> Result<()> {
        match node {
            NodeId::Session => Ok(()),
            NodeId::Identity => self.current_user().await.map(|_| ()),
            NodeId::Membership => self.groups().await.map(|_| ()),
            NodeId::RoleFlags => self.roles().await.map(|_| ()),
            NodeId::Permissions => self.permissions().await.map(|_| ()),
        }
    }

    // ============================================================================
    // Subscriptions
    // ============================================================================

    pub fn subscribe_current_user(&self) -> Subscription<Option<CurrentUser>> {
        let subscription = self.inner.identity.memo.subscribe();
        self.prefetch(NodeId::Identity);
        subscription
    }

    pub fn subscribe_groups(&self) -> Subscription<Vec<Group>> {
        let subscription = self.inner.membership.memo.subscribe();
        self.prefetch(NodeId::Membership);
        subscription
    }

    pub fn subscribe_permissions(&self) -> Subscription<Permissions> {
        let subscription = self.inner.permissions.memo.subscribe();
        self.prefetch(NodeId::Permissions);
        subscription
    }

    pub fn subscribe_roles(&self) -> Subscription<RoleFlags> {
        let subscription = self.inner.role_flags.memo.subscribe();
        self.prefetch(NodeId::RoleFlags);
        subscription
    }

    pub fn subscribe_is_admin(&self) -> Subscription<RoleFlags, bool> {
        let subscription = self
            .inner
            .role_flags
            .memo
            .subscribe_projected(RoleFlags::is_admin);
        self.prefetch(NodeId::RoleFlags);
        subscription
    }

    pub fn subscribe_is_customer_service(&self) -> Subscription<RoleFlags, bool> {
        let subscription = self
            .inner
            .role_flags
            .memo
            .subscribe_projected(RoleFlags::is_customer_service);
        self.prefetch(NodeId::RoleFlags);
        subscription
    }

    // ============================================================================
    // Evaluation
    // ============================================================================

    async fn evaluate<N, U>(&self, cell: &NodeCell<N>, upstream: U) -> Result<Arc<N::Output>>
    where
        N: DerivedNode,
        U: Fn(SessionGraph) -> BoxFuture<'static, Result<N::Upstream>>,
    {
        cell.memo
            .get_or_compute(|| {
                let node = cell.node.clone();
                let upstream = upstream(self.clone());
                async move {
                    let values = upstream.await?;
                    node.compute(values).await
                }
                .boxed()
            })
            .await
    }

    fn session_upstream(graph: SessionGraph) -> BoxFuture<'static, Result<Option<Arc<Session>>>> {
        // Read on first poll, after the memo has tagged the computation.
        async move { Ok(graph.session()) }.boxed()
    }

    fn membership_upstream(graph: SessionGraph) -> BoxFuture<'static, Result<Arc<Vec<Group>>>> {
        async move { graph.groups().await }.boxed()
    }

    fn invalidate(&self, node: NodeId) {
        match node {
            NodeId::Session => {}
            NodeId::Identity => {
                self.inner.identity.memo.invalidate();
            }
            NodeId::Membership => {
                self.inner.membership.memo.invalidate();
            }
            NodeId::RoleFlags => {
                self.inner.role_flags.memo.invalidate();
            }
            NodeId::Permissions => {
                self.inner.permissions.memo.invalidate();
            }
        }
    }

    fn subscriber_count(&self, node: NodeId) -> usize {
        match node {
            NodeId::Session => 0,
            NodeId::Identity => self.inner.identity.memo.subscriber_count(),
            NodeId::Membership => self.inner.membership.memo.subscriber_count(),
            NodeId::RoleFlags => self.inner.role_flags.memo.subscriber_count(),
            NodeId::Permissions => self.inner.permissions.memo.subscriber_count(),
        }
    }

    /// Starts a background read of `node` when a tokio runtime is available.
    fn prefetch(&self, node: NodeId) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let graph = self.clone();
        handle.spawn(async move {
            if let Err(err) = graph.refresh(node).await {
                tracing::debug!("[SessionGraph] background read of {} failed: {}", node, err);
            }
        });
    }
}
