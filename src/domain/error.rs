//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Malformed tree definition. Construction aborts and no tree is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node {id} refers to unknown parent: {parent}")]
    DanglingParent { id: String, parent: String },

    #[error("node {id} lists unknown child: {child}")]
    DanglingChild { id: String, child: String },

    #[error("node {id} lists child {child} more than once")]
    DuplicateChild { id: String, child: String },

    #[error("node {id} is claimed by two parents: {first} and {second}")]
    ConflictingParent {
        id: String,
        first: String,
        second: String,
    },

    #[error("node {0} is its own parent")]
    SelfParent(String),

    #[error("cycle detected in hierarchy at node: {0}")]
    CycleDetected(String),
}

/// Domain errors represent violations of the tree and selection rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid tree definition: {0}")]
    Construction(#[from] ConstructionError),

    #[error("node not found: {0}")]
    NotFound(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
