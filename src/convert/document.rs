use super::flat::{
    FlatCondition, flat_conditions_to_operations, flat_conditions_to_tree,
    tree_to_flat_conditions,
};
use super::operations::{Operation, build_operations_from_tree};
use crate::error::FormatError;
use crate::tree::{Condition, ConditionTree, Group, Junction, Logic, NodeId, NodeKind, NodeRef};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

/// The version tag of the tree-native storage format.
pub const TREE_FORMAT_VERSION: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RootTag {
    #[default]
    #[serde(rename = "root")]
    Root,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupTag {
    #[default]
    #[serde(rename = "group")]
    Group,
}

/// The nested JSON shape of a condition tree, as stored and exchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDocument {
    #[serde(rename = "type", default)]
    pub kind: RootTag,
    #[serde(default)]
    pub internal_logic: Junction,
    #[serde(default)]
    pub items: Vec<ItemDocument>,
}

/// A leaf or group inside a [`TreeDocument`]. Groups are told apart by their
/// `"type": "group"` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemDocument {
    Group(GroupDocument),
    Condition(ConditionDocument),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDocument {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: GroupTag,
    #[serde(default)]
    pub logic: Logic,
    #[serde(default)]
    pub internal_logic: Junction,
    #[serde(default)]
    pub items: Vec<ItemDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDocument {
    pub id: NodeId,
    pub field: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: String,
}

/// `{ "version": 2, "tree": ... }`, the envelope newer clients persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEnvelope {
    pub version: u64,
    pub tree: TreeDocument,
}

impl TreeEnvelope {
    pub fn new(tree: TreeDocument) -> Self {
        Self {
            version: TREE_FORMAT_VERSION,
            tree,
        }
    }
}

impl ConditionTree {
    /// Renders the arena back into its nested JSON shape.
    pub fn to_document(&self) -> TreeDocument {
        TreeDocument {
            kind: RootTag::Root,
            internal_logic: self.internal_logic,
            items: self.item_documents(&self.items),
        }
    }

    fn item_documents(&self, ids: &[NodeId]) -> Vec<ItemDocument> {
        ids.iter()
            .filter_map(|id| self.node(id))
            .map(|node| match node {
                NodeRef::Leaf { id, condition } => ItemDocument::Condition(ConditionDocument {
                    id: id.clone(),
                    field: condition.field.clone(),
                    operator: condition.operator.clone(),
                    value: condition.value.clone(),
                }),
                NodeRef::Group { id, group } => ItemDocument::Group(GroupDocument {
                    id: id.clone(),
                    kind: GroupTag::Group,
                    logic: group.logic,
                    internal_logic: group.internal_logic,
                    items: self.item_documents(&group.items),
                }),
            })
            .collect()
    }

    /// Builds a tree from its nested JSON shape, keeping the stored ids.
    /// Fails if an id appears more than once.
    pub fn from_document(document: &TreeDocument) -> Result<Self, FormatError> {
        let mut tree = ConditionTree {
            internal_logic: document.internal_logic,
            ..ConditionTree::default()
        };
        let mut seen = AHashSet::new();
        // Parents are attached before their children, so every group exists
        // by the time its items are appended to it.
        let mut pending: Vec<(Option<NodeId>, &ItemDocument)> =
            document.items.iter().map(|item| (None, item)).collect();
        pending.reverse();

        while let Some((parent, item)) = pending.pop() {
            let (id, kind) = match item {
                ItemDocument::Condition(doc) => (
                    &doc.id,
                    NodeKind::Leaf(Condition::new(&doc.field, &doc.operator, &doc.value)),
                ),
                ItemDocument::Group(doc) => {
                    pending.extend(
                        doc.items
                            .iter()
                            .rev()
                            .map(|child| (Some(doc.id.clone()), child)),
                    );
                    (
                        &doc.id,
                        NodeKind::Group(Group {
                            logic: doc.logic,
                            internal_logic: doc.internal_logic,
                            items: Vec::new(),
                        }),
                    )
                }
            };
            if !seen.insert(id.clone()) {
                return Err(FormatError::DuplicateId(id.to_string()));
            }
            tree.attach(parent.as_ref(), id.clone(), kind);
        }
        trace!(nodes = tree.len(), "loaded condition tree document");
        Ok(tree)
    }
}

/// A filter as persisted by the inventory resource: either the versioned tree
/// envelope or, for filters saved before versioning existed, the flat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredFilter {
    Tree(TreeDocument),
    Flat(Vec<FlatCondition>),
}

impl StoredFilter {
    pub fn from_tree(tree: &ConditionTree) -> Self {
        StoredFilter::Tree(tree.to_document())
    }

    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Detects the stored format.
    ///
    /// Accepts a bare envelope object, a list whose first element is a version 2
    /// envelope, or a list of flat conditions. Any other version is rejected.
    pub fn from_value(value: &Value) -> Result<Self, FormatError> {
        match value {
            Value::Object(_) if value.get("version").is_some() => Self::from_envelope(value),
            Value::Array(entries) => match entries.first() {
                Some(first) if first.get("version").is_some() => Self::from_envelope(first),
                _ => {
                    warn!(
                        entries = entries.len(),
                        "stored filter has no version tag, loading legacy flat list"
                    );
                    let flat = Vec::<FlatCondition>::deserialize(value)?;
                    Ok(StoredFilter::Flat(flat))
                }
            },
            _ => Err(FormatError::UnrecognizedShape),
        }
    }

    fn from_envelope(value: &Value) -> Result<Self, FormatError> {
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(FormatError::UnrecognizedShape)?;
        if version != TREE_FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }
        let envelope = TreeEnvelope::deserialize(value)?;
        Ok(StoredFilter::Tree(envelope.tree))
    }

    /// The JSON written back to the inventory resource: `[envelope]` for trees,
    /// the plain list for flat filters.
    pub fn to_value(&self) -> Result<Value, FormatError> {
        let value = match self {
            StoredFilter::Tree(document) => {
                serde_json::to_value(vec![TreeEnvelope::new(document.clone())])?
            }
            StoredFilter::Flat(conditions) => serde_json::to_value(conditions)?,
        };
        Ok(value)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredFilter::Flat(_))
    }

    /// Loads the filter into a live tree. Flat lists become root-level leaves.
    pub fn to_tree(&self) -> Result<ConditionTree, FormatError> {
        match self {
            StoredFilter::Tree(document) => ConditionTree::from_document(document),
            StoredFilter::Flat(conditions) => Ok(flat_conditions_to_tree(conditions)),
        }
    }

    /// The flat view of the filter, for consumers that only understand the legacy list.
    pub fn to_flat(&self) -> Result<Vec<FlatCondition>, FormatError> {
        match self {
            StoredFilter::Tree(document) => {
                ConditionTree::from_document(document).map(|tree| tree_to_flat_conditions(&tree))
            }
            StoredFilter::Flat(conditions) => Ok(conditions.clone()),
        }
    }

    /// The backend operations for the filter. Flat lists use the run-grouping
    /// conversion, trees the structural one.
    pub fn to_operations(&self) -> Result<Vec<Operation>, FormatError> {
        match self {
            StoredFilter::Tree(document) => {
                ConditionTree::from_document(document).map(|tree| build_operations_from_tree(&tree))
            }
            StoredFilter::Flat(conditions) => Ok(flat_conditions_to_operations(conditions)),
        }
    }
}
