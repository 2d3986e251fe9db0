//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! sentei crate.
//!
//! # Example
//!
//! ```rust
//! use sentei::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let tree = ConditionTree::new()
//!     .add_condition(&GroupPath::root(), "role", "equals", "router")?;
//!
//! let operations = build_operations_from_tree(&tree);
//! assert_eq!(operations[0].operation_type, Logic::And);
//! # Ok(())
//! # }
//! # run_example().unwrap();
//! ```

// Tree model and editing
pub use crate::session::{SelectorSession, SessionConfig, TargetCursor};
pub use crate::tree::{
    Condition, ConditionTree, Group, GroupPath, InsertionPoint, Junction, Logic, NodeId, NodeRef,
};

// Wire formats
pub use crate::convert::{
    FlatCondition, InventoryExport, Operation, PreviewRequest, StoredFilter, TreeDocument,
    build_operations_from_tree, flat_conditions_to_operations, flat_conditions_to_tree,
    generate_tree_visualization, tree_to_flat_conditions,
};

pub use crate::catalog::FieldCatalog;

// Error types
pub use crate::error::{FormatError, ImportError, TreeError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
