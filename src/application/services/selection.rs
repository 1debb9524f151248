//! Selection service
//!
//! Loads tree definitions through the filesystem boundary, builds the
//! selection engine and applies batches of toggles.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CheckTree, Definition, Selection};
use crate::infrastructure::traits::FileSystem;

/// One requested toggle, written `id`, `id=on` or `id=off`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOp {
    pub id: String,
    pub checked: bool,
}

impl ToggleOp {
    pub fn new(id: impl Into<String>, checked: bool) -> Self {
        Self {
            id: id.into(),
            checked,
        }
    }
}

impl FromStr for ToggleOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, value) = match s.split_once('=') {
            Some((id, value)) => (id.trim(), Some(value.trim())),
            None => (s.trim(), None),
        };
        if id.is_empty() {
            return Err(format!("missing node id in '{s}'"));
        }
        let checked = match value.map(str::to_ascii_lowercase).as_deref() {
            None | Some("on" | "true" | "yes" | "1") => true,
            Some("off" | "false" | "no" | "0") => false,
            Some(other) => return Err(format!("expected on/off, got '{other}'")),
        };
        Ok(Self::new(id, checked))
    }
}

impl fmt::Display for ToggleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.checked { "on" } else { "off" };
        write!(f, "{}={}", self.id, value)
    }
}

/// Shape of a loaded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    pub nodes: usize,
    pub roots: usize,
    pub leaves: usize,
    pub depth: usize,
}

/// Service for loading trees and driving selections.
pub struct SelectionService {
    fs: Arc<dyn FileSystem>,
}

impl SelectionService {
    /// Create a new selection service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a definition file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_definition(&self, path: &Path) -> ApplicationResult<Definition> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::DefinitionNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read definition", path)?;
        let definition =
            Definition::parse(&content).map_err(|e| ApplicationError::InvalidDefinition {
                path: path.to_path_buf(),
                message: e.message,
            })?;
        debug!("load_definition: {} nodes", definition.nodes.len());
        Ok(definition)
    }

    /// Load a definition file and build a selection with its initial checks applied.
    pub fn load(&self, path: &Path) -> ApplicationResult<Selection> {
        let definition = self.load_definition(path)?;
        Self::from_definition(definition)
    }

    /// Build a selection from an in-memory definition.
    ///
    /// Nodes marked `checked` are applied through the propagation engine,
    /// in definition order.
    pub fn from_definition(definition: Definition) -> ApplicationResult<Selection> {
        let initial: Vec<String> = definition
            .initially_checked()
            .map(str::to_string)
            .collect();
        let tree = CheckTree::build(definition.nodes)?;
        let mut selection = Selection::new(Arc::new(tree));
        selection.check_many(initial.iter().map(String::as_str))?;
        Ok(selection)
    }

    /// Apply toggles in order. Every id is checked up front, so an unknown
    /// id leaves the selection untouched.
    #[instrument(level = "debug", skip(self, selection))]
    pub fn apply(&self, selection: &mut Selection, ops: &[ToggleOp]) -> ApplicationResult<()> {
        for op in ops {
            selection.tree().node(&op.id)?;
        }
        for op in ops {
            selection.toggle(&op.id, op.checked)?;
        }
        Ok(())
    }

    /// Count nodes, roots, leaves and levels.
    pub fn summary(&self, tree: &CheckTree) -> TreeSummary {
        TreeSummary {
            nodes: tree.len(),
            roots: tree.roots().count(),
            leaves: tree.leaf_ids().len(),
            depth: tree.depth(),
        }
    }
}
