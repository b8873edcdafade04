//! Domain error model shared by the foundation types.

use thiserror::Error;

/// Result type used across the domain foundation.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error for foundation concerns (identifiers, versioning).
///
/// Ledger rules have their own error type in `splitledger-group`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
