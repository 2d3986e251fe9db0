use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a leaf or group inside one tree instance.
///
/// Ids are keys, not values: they carry no ordering or meaning and are never
/// reused after the node they named was removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::new(id)
    }
}

/// The connector joining a group to its preceding sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    #[default]
    And,
    Or,
    Not,
}

impl Logic {
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
            Logic::Not => "NOT",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the items of a group (or of the root) combine with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Junction {
    #[default]
    And,
    Or,
}

impl Junction {
    pub fn flipped(self) -> Self {
        match self {
            Junction::And => Junction::Or,
            Junction::Or => Junction::And,
        }
    }

    pub fn as_str(self) -> &'static str {
        Logic::from(self).as_str()
    }
}

impl From<Junction> for Logic {
    fn from(junction: Junction) -> Self {
        match junction {
            Junction::And => Logic::And,
            Junction::Or => Logic::Or,
        }
    }
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `field operator "value"` predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.field, self.operator, self.value)
    }
}

/// An internal node. `items` holds the ids of its children in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub logic: Logic,
    pub internal_logic: Junction,
    pub items: Vec<NodeId>,
}

/// The payload stored in the arena, resolved once when the node is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(Condition),
    Group(Group),
}

impl NodeKind {
    pub fn is_group(&self) -> bool {
        matches!(self, NodeKind::Group(_))
    }
}

/// A node as stored in the arena, with its parent link.
///
/// `parent` is `None` for items sitting directly under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

/// A borrowed view of a node, as handed out by the traversal API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Leaf {
        id: &'a NodeId,
        condition: &'a Condition,
    },
    Group {
        id: &'a NodeId,
        group: &'a Group,
    },
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a NodeId {
        match self {
            NodeRef::Leaf { id, .. } | NodeRef::Group { id, .. } => id,
        }
    }

    pub fn as_condition(&self) -> Option<&'a Condition> {
        match self {
            NodeRef::Leaf { condition, .. } => Some(condition),
            NodeRef::Group { .. } => None,
        }
    }

    pub fn as_group(&self) -> Option<&'a Group> {
        match self {
            NodeRef::Group { group, .. } => Some(group),
            NodeRef::Leaf { .. } => None,
        }
    }
}
