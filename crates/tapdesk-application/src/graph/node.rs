//! Node identities and the dependency edges between them.

use std::collections::{HashMap, VecDeque};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use tapdesk_core::{DeskError, Result};

/// The fixed set of nodes in the session graph.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum NodeId {
    /// The raw session; the only externally settable node.
    Session,
    Identity,
    Membership,
    RoleFlags,
    Permissions,
}

impl NodeId {
    /// Nodes this node is computed from.
    pub fn upstream(self) -> &'static [NodeId] {
        match self {
            NodeId::Session => &[],
            NodeId::Identity => &[NodeId::Session],
            NodeId::Membership => &[NodeId::Session],
            NodeId::RoleFlags => &[NodeId::Session],
            NodeId::Permissions => &[NodeId::Membership],
        }
    }

    /// Source nodes hold an externally set value instead of a computation.
    pub fn is_source(self) -> bool {
        self.upstream().is_empty()
    }
}

/// Acyclic dependency edges, indexed for invalidation.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// upstream -> nodes that read it directly
    dependents: HashMap<NodeId, Vec<NodeId>>,
    /// every node, upstream before downstream
    order: Vec<NodeId>,
}

impl DependencyGraph {
    /// Builds the graph from the edges declared by `NodeId::upstream`.
    pub fn new() -> Result<Self> {
        Self::with_edges(NodeId::iter().map(|node| (node, node.upstream().to_vec())))
    }

    /// Builds a graph from explicit `(node, upstream)` declarations.
    ///
    /// Fails when the declarations contain a cycle.
    pub fn with_edges(edges: impl IntoIterator<Item = (NodeId, Vec<NodeId>)>) -> Result<Self> {
        let mut dependents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut in_degree: HashMap<NodeId, usize> = HashMap::new();

        for (node, upstream) in edges {
            in_degree.entry(node).or_insert(0);
            for up in upstream {
                in_degree.entry(up).or_insert(0);
                *in_degree.entry(node).or_insert(0) += 1;
                dependents.entry(up).or_default().push(node);
            }
        }

        // Kahn's algorithm; sorted seeds keep the order deterministic.
        let mut ready: Vec<NodeId> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| *node)
            .collect();
        ready.sort();
        let mut queue: VecDeque<NodeId> = ready.into();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(node) = queue.pop_front() {
            order.push(node);
            let mut next = Vec::new();
            for dependent in dependents.get(&node).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        next.push(*dependent);
                    }
                }
            }
            next.sort();
            queue.extend(next);
        }

        if order.len() != in_degree.len() {
            let mut cyclic: Vec<NodeId> = in_degree
                .into_iter()
                .filter(|(node, _)| !order.contains(node))
                .map(|(node, _)| node)
                .collect();
            cyclic.sort();
            return Err(DeskError::internal(format!(
                "dependency cycle between nodes: {:?}",
                cyclic
            )));
        }

        Ok(Self { dependents, order })
    }

    /// Every node, upstream before downstream.
    pub fn topological_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes that read `node` directly.
    pub fn direct_dependents(&self, node: NodeId) -> &[NodeId] {
        self.dependents
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every node transitively reachable from `node`, in topological order.
    ///
    /// `node` itself is not included.
    pub fn affected_by(&self, node: NodeId) -> Vec<NodeId> {
        let mut reached = Vec::new();
        let mut frontier = vec![node];
        while let Some(current) = frontier.pop() {
            for dependent in self.direct_dependents(current) {
                if !reached.contains(dependent) {
                    reached.push(*dependent);
                    frontier.push(*dependent);
                }
            }
        }

        self.order
            .iter()
            .copied()
            .filter(|candidate| reached.contains(candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_is_the_only_source() {
        let sources: Vec<NodeId> = NodeId::iter().filter(|n| n.is_source()).collect();
        assert_eq!(sources, vec![NodeId::Session]);
    }

    #[test]
    fn test_session_invalidates_every_derived_node() {
        let graph = DependencyGraph::new().unwrap();
        let affected = graph.affected_by(NodeId::Session);
        assert_eq!(affected.len(), 4);
        assert!(!affected.contains(&NodeId::Session));

        let membership = affected
            .iter()
            .position(|n| *n == NodeId::Membership)
            .unwrap();
        let permissions = affected
            .iter()
            .position(|n| *n == NodeId::Permissions)
            .unwrap();
        assert!(membership < permissions);
    }

    #[test]
    fn test_membership_only_reaches_permissions() {
        let graph = DependencyGraph::new().unwrap();
        assert_eq!(
            graph.affected_by(NodeId::Membership),
            vec![NodeId::Permissions]
        );
        assert!(graph.affected_by(NodeId::Permissions).is_empty());
    }

    #[test]
    fn test_topological_order_starts_with_session() {
        let graph = DependencyGraph::new().unwrap();
        assert_eq!(graph.topological_order().first(), Some(&NodeId::Session));
        assert_eq!(graph.topological_order().len(), 5);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let result = DependencyGraph::with_edges(vec![
            (NodeId::Session, vec![]),
            (NodeId::Identity, vec![NodeId::Session, NodeId::Permissions]),
            (NodeId::Permissions, vec![NodeId::Identity]),
        ]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_node_names() {
        assert_eq!(NodeId::RoleFlags.to_string(), "role_flags");
        let name: &'static str = NodeId::Membership.into();
        assert_eq!(name, "membership");
    }
}
