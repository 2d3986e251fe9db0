use crate::error::TreeError;
use crate::tree::{Condition, ConditionTree, Group, Logic, NodeRef};
use itertools::{Either, Itertools};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One node of the payload accepted by the preview/execute endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_type: Logic,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub nested_operations: Vec<Operation>,
}

impl Operation {
    pub fn new(
        operation_type: Logic,
        conditions: Vec<Condition>,
        nested_operations: Vec<Operation>,
    ) -> Self {
        Self {
            operation_type,
            conditions,
            nested_operations,
        }
    }

    /// A lone condition, wrapped in AND.
    pub fn single(condition: Condition) -> Self {
        Self::new(Logic::And, vec![condition], vec![])
    }

    /// Exactly one condition and nothing nested.
    pub fn is_bare_condition(&self) -> bool {
        self.conditions.len() == 1 && self.nested_operations.is_empty()
    }
}

/// The body of a preview or execute request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub operations: Vec<Operation>,
}

impl PreviewRequest {
    /// Builds the request for `tree`. A tree without a single condition, even
    /// one holding empty groups, means "no filter", which the endpoint must
    /// never receive.
    pub fn from_tree(tree: &ConditionTree) -> Result<Self, TreeError> {
        if !tree.has_conditions() {
            return Err(TreeError::EmptyFilter);
        }
        Ok(Self {
            operations: build_operations_from_tree(tree),
        })
    }
}

/// A converted root-level item together with the connector it had in the tree.
struct Tagged {
    logic: Logic,
    operation: Operation,
}

/// Converts `tree` into the operations payload.
///
/// Root-level NOT groups are split off and appended last, each forced to `NOT`.
/// When more than one other operation remains, lone conditions are hoisted into
/// a shared condition list and compound groups become nested operations of a
/// single top-level operation using the root's internal logic. A single
/// remaining operation is emitted as is. An empty tree yields no operations.
pub fn build_operations_from_tree(tree: &ConditionTree) -> Vec<Operation> {
    let (regular, negated): (Vec<Operation>, Vec<Operation>) = tree
        .items()
        .iter()
        .filter_map(|id| tree.node(id))
        .map(|node| convert_item(tree, node))
        .partition_map(|tagged| match tagged.logic {
            Logic::Not => Either::Right(tagged.operation),
            _ => Either::Left(tagged.operation),
        });

    let mut operations = if regular.len() > 1 {
        let (bare, compound): (Vec<Operation>, Vec<Operation>) =
            regular.into_iter().partition(Operation::is_bare_condition);
        let root_conditions = bare.into_iter().flat_map(|op| op.conditions).collect();
        vec![Operation::new(
            tree.internal_logic().into(),
            root_conditions,
            compound,
        )]
    } else {
        regular
    };

    operations.extend(negated.into_iter().map(|mut operation| {
        operation.operation_type = Logic::Not;
        operation
    }));
    trace!(
        items = tree.items().len(),
        operations = operations.len(),
        "built operations from tree"
    );
    operations
}

fn convert_item(tree: &ConditionTree, node: NodeRef<'_>) -> Tagged {
    match node {
        NodeRef::Leaf { condition, .. } => Tagged {
            logic: Logic::And,
            operation: Operation::single(condition.clone()),
        },
        NodeRef::Group { group, .. } => Tagged {
            logic: group.logic,
            operation: convert_group(tree, group),
        },
    }
}

/// Direct leaves become the group's conditions; sub-groups become nested
/// operations, typed `NOT` when negated and by their own internal logic otherwise.
fn convert_group(tree: &ConditionTree, group: &Group) -> Operation {
    let (conditions, nested_operations): (Vec<Condition>, Vec<Operation>) = group
        .items
        .iter()
        .filter_map(|id| tree.node(id))
        .partition_map(|child| match child {
            NodeRef::Leaf { condition, .. } => Either::Left(condition.clone()),
            NodeRef::Group { group: sub, .. } => {
                let mut operation = convert_group(tree, sub);
                if sub.logic == Logic::Not {
                    operation.operation_type = Logic::Not;
                }
                Either::Right(operation)
            }
        });
    Operation::new(group.internal_logic.into(), conditions, nested_operations)
}
