//! Domain layer: tree model, propagation engine and state queries
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod selection;
pub mod state;

pub use arena::{Ancestors, CheckTree, Descendants, NodeData, TreeNode};
pub use builder::TreeBuilder;
pub use entities::*;
pub use error::{ConstructionError, DomainError, DomainResult};
pub use selection::Selection;
pub use state::CheckState;
