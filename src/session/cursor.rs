use crate::tree::{ConditionTree, GroupPath, InsertionPoint, NodeId};
use tracing::{debug, warn};

/// The targeting cursor: which group new conditions and groups go into.
///
/// It is either on the root or on one group, addressed by the ancestor path
/// to it. Targeting a group that cannot be found, or losing the targeted
/// group to a removal, puts the cursor back on the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetCursor {
    path: GroupPath,
}

impl TargetCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &GroupPath {
        &self.path
    }

    /// The targeted group, `None` while on the root.
    pub fn target(&self) -> Option<&NodeId> {
        self.path.target()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    pub fn reset(&mut self) {
        self.path = GroupPath::root();
    }

    /// Moves the cursor onto `group`, or onto the root for `None` or an unknown group.
    pub fn set_target(&mut self, tree: &ConditionTree, group: Option<&NodeId>) -> InsertionPoint {
        match group.map(|id| (id, tree.find_path_to_group(id))) {
            None => self.reset(),
            Some((_, Some(path))) => self.path = path,
            Some((id, None)) => {
                warn!(group = %id, "cannot target unknown group, targeting root");
                self.reset();
            }
        }
        self.insertion_point(tree)
    }

    /// Re-checks the cursor against `tree`, falling back to the root when its
    /// path no longer resolves. Returns `true` if the cursor moved.
    pub fn reconcile(&mut self, tree: &ConditionTree) -> bool {
        let Some(target) = self.path.target() else {
            return false;
        };
        let resolved = tree.resolve_insertion_point(&self.path);
        if resolved.group_id() == Some(target) {
            return false;
        }
        debug!(group = %target, "targeted group is gone, targeting root");
        self.reset();
        true
    }

    pub fn insertion_point(&self, tree: &ConditionTree) -> InsertionPoint {
        tree.resolve_insertion_point(&self.path)
    }
}
