use super::arena::ConditionTree;
use super::node::NodeId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The ids of the groups leading from the root (exclusive) down to a target group.
/// The empty path addresses the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupPath(Vec<NodeId>);

impl GroupPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[NodeId] {
        &self.0
    }

    /// The group the path ends in, `None` for the root path.
    pub fn target(&self) -> Option<&NodeId> {
        self.0.last()
    }
}

impl From<Vec<NodeId>> for GroupPath {
    fn from(segments: Vec<NodeId>) -> Self {
        GroupPath(segments)
    }
}

/// Where new conditions and groups get appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum InsertionPoint {
    #[default]
    Root,
    Group(NodeId),
}

impl InsertionPoint {
    pub fn group_id(&self) -> Option<&NodeId> {
        match self {
            InsertionPoint::Root => None,
            InsertionPoint::Group(id) => Some(id),
        }
    }
}

impl ConditionTree {
    /// Returns the ancestor group ids of `group_id` followed by `group_id` itself,
    /// or `None` if no group with that id exists.
    pub fn find_path_to_group(&self, group_id: &NodeId) -> Option<GroupPath> {
        self.group(group_id)?;
        let mut segments = vec![group_id.clone()];
        let mut cursor = self.parent(group_id);
        while let Some(parent) = cursor {
            segments.push(parent.clone());
            cursor = self.parent(parent);
        }
        segments.reverse();
        Some(GroupPath(segments))
    }

    /// Resolves `path` top-down. Every segment must be a group found directly inside
    /// the previous level; if any segment fails the whole path falls back to the root.
    pub fn resolve_insertion_point(&self, path: &GroupPath) -> InsertionPoint {
        let mut level: Option<&NodeId> = None;
        for segment in path.segments() {
            let found = self.children(level).contains(segment) && self.group(segment).is_some();
            if !found {
                warn!(
                    segment = %segment,
                    depth = path.segments().len(),
                    "insertion path does not resolve, falling back to root"
                );
                return InsertionPoint::Root;
            }
            level = Some(segment);
        }
        level.map_or(InsertionPoint::Root, |id| InsertionPoint::Group(id.clone()))
    }
}
