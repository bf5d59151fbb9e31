use crate::graph::{DerivedNode, NodeId};
use async_trait::async_trait;
use std::sync::Arc;
use tapdesk_core::{Group, Permissions, Result};

/// Folds the grants of every group into the permission baseline.
#[derive(Debug, Clone, Copy)]
pub struct PermissionsNode {
    baseline: Permissions,
}

impl PermissionsNode {
    pub fn new(baseline: Permissions) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> Permissions {
        self.baseline
    }
}

impl Default for PermissionsNode {
    fn default() -> Self {
        Self::new(Permissions::default())
    }
}

#[async_trait]
impl DerivedNode for PermissionsNode {
    type Upstream = Arc<Vec<Group>>;
    type Output = Permissions;

    const ID: NodeId = NodeId::Permissions;

    async fn compute(&self, groups: Self::Upstream) -> Result<Self::Output> {
        Ok(Permissions::fold(
            self.baseline,
            groups.iter().map(|group| &group.permissions),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapdesk_core::PartialPermissions;

    #[tokio::test]
    async fn test_no_groups_yields_baseline() {
        let node = PermissionsNode::default();
        let permissions = node.compute(Arc::new(Vec::new())).await.unwrap();
        assert_eq!(permissions, Permissions::default());
    }

    #[tokio::test]
    async fn test_grant_from_any_group_wins() {
        let groups = vec![
            Group::new("g1", "Stats", "r1")
                .with_permissions(PartialPermissions::default().with_statistics(true)),
            Group::new("g2", "Restricted", "r2")
                .with_permissions(PartialPermissions::default().with_view(false)),
        ];
        let permissions = PermissionsNode::default()
            .compute(Arc::new(groups))
            .await
            .unwrap();
        assert_eq!(
            permissions,
            Permissions {
                view: true,
                ticket_list: true,
                statistics: true,
            }
        );
    }
}
