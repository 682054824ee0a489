//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// invariant conflicts, missing entities). Infrastructure concerns are
/// carried by [`StoreError`] instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A business invariant was violated (duplicate pickup point, reception
    /// in the wrong state, nothing left to remove).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced entity is absent.
    #[error("not found")]
    NotFound,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

/// Opaque storage-layer failure (connectivity, timeout, bad row).
///
/// Distinct from "row not found": store operations report absence as
/// `Ok(None)` or a dedicated outcome, never as a `StoreError`. Services
/// attach operation context when they propagate one of these.
#[derive(Debug, Error)]
#[error("storage failure: {0}")]
pub struct StoreError(#[from] pub anyhow::Error);

impl StoreError {
    pub fn new(source: impl Into<anyhow::Error>) -> Self {
        Self(source.into())
    }
}
