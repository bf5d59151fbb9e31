use super::node::NodeId;
use async_trait::async_trait;
use tapdesk_core::Result;

/// A node whose value is computed from its upstream nodes.
///
/// Implementations are pure with respect to the graph: they receive the
/// upstream values and return a new value, and never touch other nodes.
#[async_trait]
pub trait DerivedNode: Send + Sync + 'static {
    /// Values of the upstream nodes, as handed over by the evaluator.
    type Upstream: Send + 'static;
    type Output: Send + Sync + 'static;

    const ID: NodeId;

    async fn compute(&self, upstream: Self::Upstream) -> Result<Self::Output>;
}
