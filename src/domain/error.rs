//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the entity model or markup rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("unknown component {component} referenced by {parent}")]
    UnknownComponent { parent: String, component: String },

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("malformed markup: {reason}")]
    MalformedMarkup { reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
