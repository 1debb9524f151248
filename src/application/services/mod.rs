//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod selection;
mod shared;

pub use selection::{SelectionService, ToggleOp, TreeSummary};
pub use shared::SharedSelection;
