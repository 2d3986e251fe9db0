use crate::catalog::FieldCatalog;
use crate::convert::{
    FlatCondition, Operation, PreviewRequest, StoredFilter, build_operations_from_tree,
    generate_tree_visualization, tree_to_flat_conditions,
};
use crate::error::{FormatError, TreeError};
use crate::tree::{Condition, ConditionTree, InsertionPoint, Junction, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

mod cursor;

pub use cursor::TargetCursor;

/// Behaviour switches for a [`SelectorSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Put the cursor back on the root after every successful add.
    pub reset_target_after_add: bool,
    /// Reject fields and operators the catalog does not offer.
    pub validate_against_catalog: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reset_target_after_add: true,
            validate_against_catalog: false,
        }
    }
}

pub struct SessionBuilder {
    config: SessionConfig,
    catalog: FieldCatalog,
    tree: ConditionTree,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            catalog: FieldCatalog::default(),
            tree: ConditionTree::new(),
        }
    }
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = catalog;
        self
    }
    pub fn with_tree(mut self, tree: ConditionTree) -> Self {
        self.tree = tree;
        self
    }
    pub fn reset_target_after_add(mut self, reset: bool) -> Self {
        self.config.reset_target_after_add = reset;
        self
    }
    pub fn validate_against_catalog(mut self, validate: bool) -> Self {
        self.config.validate_against_catalog = validate;
        self
    }
    pub fn build(self) -> SelectorSession {
        SelectorSession {
            tree: self.tree,
            cursor: TargetCursor::new(),
            catalog: self.catalog,
            config: self.config,
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One editing session of a device filter.
///
/// Owns the current tree value and the targeting cursor. Every edit swaps in
/// the new tree returned by the mutator; edits are applied one at a time by
/// the owner of the session.
#[derive(Debug, Clone)]
pub struct SelectorSession {
    tree: ConditionTree,
    cursor: TargetCursor,
    catalog: FieldCatalog,
    config: SessionConfig,
}

impl Default for SelectorSession {
    fn default() -> Self {
        SessionBuilder::new().build()
    }
}

impl SelectorSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn tree(&self) -> &ConditionTree {
        &self.tree
    }

    pub fn cursor(&self) -> &TargetCursor {
        &self.cursor
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Adds a condition at the cursor and returns the new leaf's id.
    pub fn add_condition(
        &mut self,
        field: &str,
        operator: &str,
        value: &str,
    ) -> Result<NodeId, TreeError> {
        if self.config.validate_against_catalog {
            self.catalog.validate(field, operator)?;
        }
        let (tree, id) = self
            .tree
            .insert_condition(self.cursor.path(), Condition::new(field, operator, value))?;
        self.tree = tree;
        self.after_add();
        Ok(id)
    }

    /// Adds an empty group at the cursor and returns its id.
    pub fn add_group(&mut self, connector: Junction, negate: bool) -> NodeId {
        let (tree, id) = self.tree.insert_group(self.cursor.path(), connector, negate);
        self.tree = tree;
        self.after_add();
        id
    }

    fn after_add(&mut self) {
        if self.config.reset_target_after_add {
            self.cursor.reset();
        }
    }

    /// Removes a node and its subtree. Returns `false` if the id was unknown.
    pub fn remove(&mut self, id: &NodeId) -> bool {
        if !self.tree.contains(id) {
            return false;
        }
        self.tree = self.tree.remove_node(id);
        self.cursor.reconcile(&self.tree);
        true
    }

    pub fn set_group_logic(&mut self, group_id: &NodeId, logic: Junction) {
        self.tree = self.tree.set_group_internal_logic(group_id, logic);
    }

    pub fn toggle_root_logic(&mut self) {
        self.tree = self.tree.toggle_root_logic();
    }

    /// Points the cursor at `group`, or at the root for `None`.
    pub fn target_group(&mut self, group: Option<&NodeId>) -> InsertionPoint {
        self.cursor.set_target(&self.tree, group)
    }

    /// Drops every condition and starts over with an empty tree.
    pub fn clear(&mut self) {
        self.tree = ConditionTree::new();
        self.cursor.reset();
    }

    pub fn operations(&self) -> Vec<Operation> {
        build_operations_from_tree(&self.tree)
    }

    /// The preview request body; fails with [`TreeError::EmptyFilter`] when the
    /// tree holds no condition.
    pub fn preview_request(&self) -> Result<PreviewRequest, TreeError> {
        PreviewRequest::from_tree(&self.tree)
    }

    pub fn flat_conditions(&self) -> Vec<FlatCondition> {
        tree_to_flat_conditions(&self.tree)
    }

    pub fn visualize(&self) -> String {
        generate_tree_visualization(&self.tree)
    }

    /// The filter in its versioned storage form. Saving a filter without any
    /// condition is a caller error and is rejected.
    pub fn save(&self) -> Result<StoredFilter, TreeError> {
        if !self.tree.has_conditions() {
            return Err(TreeError::EmptyFilter);
        }
        Ok(StoredFilter::from_tree(&self.tree))
    }

    /// Replaces the tree with a stored filter and puts the cursor on the root.
    pub fn load(&mut self, stored: &StoredFilter) -> Result<(), FormatError> {
        self.tree = stored.to_tree()?;
        self.cursor.reset();
        debug!(nodes = self.tree.len(), legacy = stored.is_legacy(), "loaded stored filter");
        Ok(())
    }
}
