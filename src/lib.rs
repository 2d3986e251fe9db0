//! # Sentei - Device Selection Condition Trees
//!
//! **Sentei** models the boolean filter a user builds to select network devices
//! from an inventory: nested AND/OR/NOT groups of `field operator "value"`
//! predicates. The tree is an immutable value; every edit returns a new tree.
//!
//! ## Core Workflow
//!
//! 1.  **Edit**: Start from an empty [`ConditionTree`](tree::ConditionTree) and add
//!     conditions and groups at a [`GroupPath`](tree::GroupPath), or let a
//!     [`SelectorSession`](session::SelectorSession) track the target group for you.
//! 2.  **Preview**: Convert the tree into the backend operations payload with
//!     [`build_operations_from_tree`](convert::build_operations_from_tree).
//! 3.  **Persist**: Save it as a versioned [`StoredFilter`](convert::StoredFilter).
//!     Filters saved in the legacy flat format load through the same type.
//! 4.  **Show**: Render an ASCII diagram with
//!     [`generate_tree_visualization`](convert::generate_tree_visualization).
//!
//! ## Quick Start
//!
//! ```rust
//! use sentei::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut session = SelectorSession::builder().build();
//!
//! session.add_condition("status", "equals", "Active")?;
//! let sites = session.add_group(Junction::And, false);
//! session.set_group_logic(&sites, Junction::Or);
//!
//! session.target_group(Some(&sites));
//! session.add_condition("location", "equals", "Berlin")?;
//! session.target_group(Some(&sites));
//! session.add_condition("location", "equals", "Hamburg")?;
//!
//! let request = session.preview_request()?;
//! assert_eq!(request.operations.len(), 1);
//! assert_eq!(request.operations[0].conditions.len(), 1);
//! assert_eq!(request.operations[0].nested_operations.len(), 1);
//!
//! println!("{}", session.visualize());
//! let stored = session.save()?.to_value()?;
//! println!("{}", stored);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod convert;
pub mod error;
pub mod prelude;
pub mod session;
pub mod tree;
