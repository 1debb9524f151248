//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{ConstructionError, DomainError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("definition file not found: {0}")]
    DefinitionNotFound(PathBuf),

    #[error("invalid definition {path}: {message}")]
    InvalidDefinition { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("selection lock poisoned")]
    LockPoisoned,

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConstructionError> for ApplicationError {
    fn from(e: ConstructionError) -> Self {
        Self::Domain(DomainError::Construction(e))
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
