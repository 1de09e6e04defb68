//! Domain error model.

use thiserror::Error;

/// Result type used across the access-control crates.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (malformed configuration,
/// unparseable permission strings, undeclared actions). Encoding and
/// verification never produce one of these: they fail closed by mismatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A configuration invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A requested action or scope is not declared.
    #[error("not found: {0}")]
    NotFound(String),

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
