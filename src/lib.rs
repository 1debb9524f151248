//! Hierarchical tri-state selection engine.
//!
//! A [`domain::CheckTree`] is an immutable forest built once from flat node
//! definitions. A [`domain::Selection`] records which nodes are fully
//! checked; toggling a node pushes the new state down its subtree and
//! recomputes its ancestors, and `Indeterminate` is always derived.
//!
//! ```
//! use std::sync::Arc;
//! use checktree::domain::{CheckState, CheckTree, NodeDef, Selection};
//!
//! let tree = CheckTree::build(vec![
//!     NodeDef::new("phones").with_children(["iphone", "android"]),
//!     NodeDef::new("iphone"),
//!     NodeDef::new("android"),
//! ])?;
//! let mut selection = Selection::new(Arc::new(tree));
//!
//! selection.toggle("iphone", true)?;
//! assert_eq!(selection.tristate("phones")?, CheckState::Indeterminate);
//!
//! selection.toggle("android", true)?;
//! assert_eq!(selection.tristate("phones")?, CheckState::Checked);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
