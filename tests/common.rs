//! Common test utilities for building condition trees.
use sentei::prelude::*;

/// Adds a group under `path` and returns the new tree together with the group's id.
#[allow(dead_code)]
pub fn add_group_at(
    tree: &ConditionTree,
    path: &GroupPath,
    connector: Junction,
    negate: bool,
) -> (ConditionTree, NodeId) {
    let tree = tree.add_group(path, connector, negate);
    let id = tree
        .children(path.target())
        .last()
        .cloned()
        .expect("group was appended");
    (tree, id)
}

/// Adds an `equals` condition under `path`.
#[allow(dead_code)]
pub fn add_equals(tree: &ConditionTree, path: &GroupPath, field: &str, value: &str) -> ConditionTree {
    tree.add_condition(path, field, "equals", value)
        .expect("valid condition")
}

#[allow(dead_code)]
pub fn path_to(tree: &ConditionTree, group: &NodeId) -> GroupPath {
    tree.find_path_to_group(group).expect("group is reachable")
}

/// Root AND with an OR group of two locations, followed by a status leaf.
///
/// ```text
/// ROOT (AND)
/// ├─ GROUP (OR)
/// │  ├─ location equals "A"
/// │  └─ location equals "B"
/// └─ status equals "Active"
/// ```
#[allow(dead_code)]
pub fn create_or_group_tree() -> (ConditionTree, NodeId) {
    let root = GroupPath::root();
    let (tree, sites) = add_group_at(&ConditionTree::new(), &root, Junction::And, false);
    let tree = tree.set_group_internal_logic(&sites, Junction::Or);
    let sites_path = path_to(&tree, &sites);
    let tree = add_equals(&tree, &sites_path, "location", "A");
    let tree = add_equals(&tree, &sites_path, "location", "B");
    let tree = add_equals(&tree, &root, "status", "Active");
    (tree, sites)
}

/// A three-level tree mixing leaves, an OR group, a nested NOT group and a
/// negated root-level group.
///
/// ```text
/// ROOT (AND)
/// ├─ role equals "router"
/// ├─ [OR] GROUP (OR)
/// │  ├─ location equals "Berlin"
/// │  └─ [NOT] GROUP (AND)
/// │     └─ platform equals "ios"
/// └─ [NOT] GROUP (OR)
///    └─ status equals "Offline"
/// ```
#[allow(dead_code)]
pub struct NestedTree {
    pub tree: ConditionTree,
    pub outer: NodeId,
    pub inner: NodeId,
    pub negated: NodeId,
}

#[allow(dead_code)]
pub fn create_nested_tree() -> NestedTree {
    let root = GroupPath::root();
    let tree = add_equals(&ConditionTree::new(), &root, "role", "router");

    let (tree, outer) = add_group_at(&tree, &root, Junction::Or, false);
    let tree = tree.set_group_internal_logic(&outer, Junction::Or);
    let outer_path = path_to(&tree, &outer);
    let tree = add_equals(&tree, &outer_path, "location", "Berlin");

    let (tree, inner) = add_group_at(&tree, &outer_path, Junction::And, true);
    let inner_path = path_to(&tree, &inner);
    let tree = add_equals(&tree, &inner_path, "platform", "ios");

    let (tree, negated) = add_group_at(&tree, &root, Junction::And, true);
    let tree = tree.set_group_internal_logic(&negated, Junction::Or);
    let tree = add_equals(&tree, &path_to(&tree, &negated), "status", "Offline");

    NestedTree {
        tree,
        outer,
        inner,
        negated,
    }
}

/// The `(field, operator, value)` triples of every leaf, depth-first.
#[allow(dead_code)]
pub fn leaf_triples(tree: &ConditionTree) -> Vec<(String, String, String)> {
    tree.leaves()
        .map(|c| (c.field.clone(), c.operator.clone(), c.value.clone()))
        .collect()
}

#[allow(dead_code)]
pub fn equals(field: &str, value: &str) -> Condition {
    Condition::new(field, "equals", value)
}
