use super::arena::ConditionTree;
use super::id::{IdKind, next_id};
use super::node::{Condition, Group, Junction, Logic, NodeId, NodeKind};
use super::path::GroupPath;
use crate::error::TreeError;
use tracing::debug;

impl ConditionTree {
    /// Appends a new leaf to the group addressed by `target` (the root for the empty path).
    ///
    /// `field` and `value` must not be blank; the edit is rejected instead of
    /// storing a half-filled condition. An unresolvable `target` falls back to
    /// the root.
    pub fn add_condition(
        &self,
        target: &GroupPath,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<ConditionTree, TreeError> {
        self.insert_condition(target, Condition::new(field, operator, value))
            .map(|(tree, _)| tree)
    }

    /// Appends a new, empty group to the group addressed by `target`.
    ///
    /// The group combines its own items with AND. It joins its preceding sibling
    /// with `connector`, or with NOT when `negate` is set.
    pub fn add_group(&self, target: &GroupPath, connector: Junction, negate: bool) -> ConditionTree {
        self.insert_group(target, connector, negate).0
    }

    pub(crate) fn insert_condition(
        &self,
        target: &GroupPath,
        condition: Condition,
    ) -> Result<(ConditionTree, NodeId), TreeError> {
        if condition.field.trim().is_empty() {
            return Err(TreeError::MissingField);
        }
        if condition.value.trim().is_empty() {
            return Err(TreeError::MissingValue);
        }

        let point = self.resolve_insertion_point(target);
        let id = next_id(IdKind::Item);
        debug!(id = %id, target = ?point.group_id(), condition = %condition, "adding condition");

        let mut tree = self.clone();
        tree.attach(point.group_id(), id.clone(), NodeKind::Leaf(condition));
        Ok((tree, id))
    }

    pub(crate) fn insert_group(
        &self,
        target: &GroupPath,
        connector: Junction,
        negate: bool,
    ) -> (ConditionTree, NodeId) {
        let logic = if negate { Logic::Not } else { connector.into() };
        let point = self.resolve_insertion_point(target);
        let id = next_id(IdKind::Group);
        debug!(id = %id, target = ?point.group_id(), %logic, "adding group");

        let mut tree = self.clone();
        tree.attach(
            point.group_id(),
            id.clone(),
            NodeKind::Group(Group {
                logic,
                internal_logic: Junction::And,
                items: Vec::new(),
            }),
        );
        (tree, id)
    }

    /// Removes the node with `node_id` and, for a group, everything beneath it.
    /// Unknown ids leave the tree unchanged.
    pub fn remove_node(&self, node_id: &NodeId) -> ConditionTree {
        let mut tree = self.clone();
        let removed = tree.detach(node_id);
        debug!(id = %node_id, removed, remaining = tree.len(), "removed node");
        tree
    }

    /// Replaces the internal logic of the group `group_id`. Unknown ids and leaf
    /// ids leave the tree unchanged.
    pub fn set_group_internal_logic(&self, group_id: &NodeId, logic: Junction) -> ConditionTree {
        let mut tree = self.clone();
        if let Some(NodeKind::Group(group)) = tree.nodes.get_mut(group_id).map(|n| &mut n.kind) {
            debug!(id = %group_id, from = %group.internal_logic, to = %logic, "setting group logic");
            group.internal_logic = logic;
        }
        tree
    }

    /// Flips the root's internal logic between AND and OR.
    pub fn toggle_root_logic(&self) -> ConditionTree {
        let mut tree = self.clone();
        tree.internal_logic = tree.internal_logic.flipped();
        debug!(logic = %tree.internal_logic, "toggled root logic");
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_value_is_rejected() {
        let tree = ConditionTree::new();
        let result = tree.add_condition(&GroupPath::root(), "role", "equals", "   ");
        assert_eq!(result, Err(TreeError::MissingValue));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_group_parent_link_is_recorded() {
        let tree = ConditionTree::new().add_group(&GroupPath::root(), Junction::And, false);
        let group_id = tree.items()[0].clone();
        let path = GroupPath::from(vec![group_id.clone()]);
        let tree = tree
            .add_condition(&path, "role", "equals", "router")
            .expect("valid condition");

        let leaf_id = &tree.group(&group_id).expect("group exists").items[0];
        assert_eq!(tree.parent(leaf_id), Some(&group_id));
        assert_eq!(tree.parent(&group_id), None);
    }
}
