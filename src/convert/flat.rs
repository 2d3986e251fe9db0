//! The legacy flat condition list.
//!
//! Filters saved before the tree format existed are a plain ordered list of
//! `{field, operator, value, logic}` entries. The list cannot express nesting,
//! so converting a tree into it and back keeps the leaves and their order but
//! drops every group. That loss is accepted: the flat form only exists for
//! backward compatibility.

use super::operations::Operation;
use crate::tree::id::{IdKind, next_id};
use crate::tree::{Condition, ConditionTree, Logic, NodeKind};
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::trace;

/// One entry of the legacy flat list. `logic` on the first entry is ignored by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatCondition {
    pub field: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, deserialize_with = "logic_any_case")]
    pub logic: Logic,
}

/// Older clients stored the connective in whatever case they used, so `"and"`
/// and `"Not"` are read the same as `"AND"` and `"NOT"`.
fn logic_any_case<'de, D>(deserializer: D) -> Result<Logic, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_uppercase().as_str() {
        "AND" => Ok(Logic::And),
        "OR" => Ok(Logic::Or),
        "NOT" => Ok(Logic::Not),
        _ => Err(de::Error::unknown_variant(&raw, &["AND", "OR", "NOT"])),
    }
}

impl FlatCondition {
    pub fn new(condition: Condition, logic: Logic) -> Self {
        Self {
            field: condition.field,
            operator: condition.operator,
            value: condition.value,
            logic,
        }
    }

    pub fn condition(&self) -> Condition {
        Condition::new(&self.field, &self.operator, &self.value)
    }
}

/// Flattens `tree` into the legacy list.
///
/// Leaves are emitted depth-first, left to right. The first leaf carries AND;
/// every other leaf carries the internal logic of its immediate parent (the
/// root's for root-level leaves). Group connectors, NOT included, are lost.
pub fn tree_to_flat_conditions(tree: &ConditionTree) -> Vec<FlatCondition> {
    let flat: Vec<FlatCondition> = tree
        .walk()
        .filter_map(|(_, node)| node.as_condition().map(|c| (node.id(), c)))
        .enumerate()
        .map(|(index, (id, condition))| {
            let logic = if index == 0 {
                Logic::And
            } else {
                let parent_logic = tree
                    .parent(id)
                    .and_then(|parent| tree.group(parent))
                    .map_or(tree.internal_logic(), |group| group.internal_logic);
                Logic::from(parent_logic)
            };
            FlatCondition::new(condition.clone(), logic)
        })
        .collect();
    trace!(nodes = tree.len(), emitted = flat.len(), "flattened condition tree");
    flat
}

/// Rebuilds a tree from the legacy list: every entry becomes a root-level leaf,
/// the root combines with AND and no groups are reconstructed.
///
/// Entries are taken as stored; blank fields are not rejected here because they
/// were accepted when the list was saved.
pub fn flat_conditions_to_tree(conditions: &[FlatCondition]) -> ConditionTree {
    let mut tree = ConditionTree::new();
    for entry in conditions {
        tree.attach(None, next_id(IdKind::Item), NodeKind::Leaf(entry.condition()));
    }
    trace!(leaves = tree.len(), "rebuilt condition tree from flat list");
    tree
}

/// Converts a legacy list straight into backend operations.
///
/// Consecutive AND or OR entries with the same logic form one operation; a
/// change of logic starts a new one. Every NOT entry becomes its own `NOT`
/// operation after the run that precedes it.
pub fn flat_conditions_to_operations(conditions: &[FlatCondition]) -> Vec<Operation> {
    let mut operations = Vec::new();
    let mut run_logic = Logic::And;
    let mut run: Vec<Condition> = Vec::new();

    for entry in conditions {
        match entry.logic {
            Logic::Not => {
                if !run.is_empty() {
                    operations.push(Operation::new(run_logic, std::mem::take(&mut run), vec![]));
                }
                operations.push(Operation::new(Logic::Not, vec![entry.condition()], vec![]));
            }
            logic => {
                if !run.is_empty() && logic != run_logic {
                    operations.push(Operation::new(run_logic, std::mem::take(&mut run), vec![]));
                }
                run_logic = logic;
                run.push(entry.condition());
            }
        }
    }
    if !run.is_empty() {
        operations.push(Operation::new(run_logic, run, vec![]));
    }
    operations
}
