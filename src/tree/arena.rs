use super::node::{Condition, Group, Junction, Node, NodeId, NodeKind, NodeRef};
use ahash::AHashMap;

/// The user-editable boolean expression behind a device selection.
///
/// Nodes live in a flat arena keyed by id. Groups keep the ordered ids of
/// their children and every node keeps its parent id, so lookups by id are
/// O(1) and edits only touch the affected parent. The tree-shaped view is
/// recovered through [`ConditionTree::walk`] and [`ConditionTree::children`].
///
/// Edits never happen in place; see the mutator methods, which return a new
/// tree value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionTree {
    pub(crate) internal_logic: Junction,
    pub(crate) items: Vec<NodeId>,
    pub(crate) nodes: AHashMap<NodeId, Node>,
}

impl ConditionTree {
    /// An empty tree whose root combines its items with AND.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn internal_logic(&self) -> Junction {
        self.internal_logic
    }

    /// The ids of the root-level items, in order.
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    /// `true` when the root holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes (leaves and groups) in the whole tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        self.nodes
            .get_key_value(id)
            .map(|(id, node)| Self::view(id, node))
    }

    pub fn group(&self, id: &NodeId) -> Option<&Group> {
        match self.nodes.get(id).map(|node| &node.kind) {
            Some(NodeKind::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// The parent group of `id`, or `None` when it sits at root level or does not exist.
    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|node| node.parent.as_ref())
    }

    /// Children of a group, or of the root when `parent` is `None`.
    /// Leaves and unknown ids have no children.
    pub fn children(&self, parent: Option<&NodeId>) -> &[NodeId] {
        match parent {
            None => &self.items,
            Some(id) => self
                .group(id)
                .map(|group| group.items.as_slice())
                .unwrap_or_default(),
        }
    }

    /// Depth-first, left-to-right traversal. Root-level items have depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: self.items.iter().rev().map(|id| (0, id)).collect(),
        }
    }

    /// `true` when at least one leaf exists anywhere in the tree. A tree made
    /// only of empty groups filters on nothing.
    pub fn has_conditions(&self) -> bool {
        self.leaves().next().is_some()
    }

    /// Every leaf condition in depth-first, left-to-right order.
    pub fn leaves(&self) -> impl Iterator<Item = &Condition> + '_ {
        self.walk().filter_map(|(_, node)| node.as_condition())
    }

    fn view<'a>(id: &'a NodeId, node: &'a Node) -> NodeRef<'a> {
        match &node.kind {
            NodeKind::Leaf(condition) => NodeRef::Leaf { id, condition },
            NodeKind::Group(group) => NodeRef::Group { id, group },
        }
    }

    /// Appends a node to the end of `parent`'s items. The caller guarantees that
    /// `parent` is a group of this tree (or `None` for root) and that `id` is fresh.
    pub(crate) fn attach(&mut self, parent: Option<&NodeId>, id: NodeId, kind: NodeKind) {
        match parent {
            None => self.items.push(id.clone()),
            Some(parent_id) => match self.nodes.get_mut(parent_id).map(|n| &mut n.kind) {
                Some(NodeKind::Group(group)) => group.items.push(id.clone()),
                _ => return,
            },
        }
        self.nodes.insert(
            id,
            Node {
                parent: parent.cloned(),
                kind,
            },
        );
    }

    /// Unlinks `id` from its parent and drops it together with its subtree.
    /// Returns the number of nodes removed.
    pub(crate) fn detach(&mut self, id: &NodeId) -> usize {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        match node.parent.clone() {
            None => self.items.retain(|item| item != id),
            Some(parent_id) => {
                if let Some(NodeKind::Group(group)) =
                    self.nodes.get_mut(&parent_id).map(|n| &mut n.kind)
                {
                    group.items.retain(|item| item != id);
                }
            }
        }

        let mut removed = 0;
        let mut pending = vec![id.clone()];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                removed += 1;
                if let NodeKind::Group(group) = node.kind {
                    pending.extend(group.items);
                }
            }
        }
        removed
    }
}

/// Iterator returned by [`ConditionTree::walk`], yielding `(depth, node)` pairs.
pub struct Walk<'a> {
    tree: &'a ConditionTree,
    stack: Vec<(usize, &'a NodeId)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, NodeRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, id) = self.stack.pop()?;
            let Some((id, node)) = self.tree.nodes.get_key_value(id) else {
                continue;
            };
            if let NodeKind::Group(group) = &node.kind {
                self.stack
                    .extend(group.items.iter().rev().map(|child| (depth + 1, child)));
            }
            return Some((depth, ConditionTree::view(id, node)));
        }
    }
}
