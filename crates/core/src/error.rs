//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every rejection surfaced to callers carries a stable [`ErrorKind`] plus a
/// human-readable reason. Only `InsufficientStock`, `Conflict` and
/// `Persistence` can be raised after a mutation was attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The actor lacks the required role, or is not the expected identity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Status guard failed on the first read, before any mutation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Status guard failed on the write (a concurrent caller won the race).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A guarded decrement found less stock than requested.
    #[error("insufficient stock for {item} (requested {requested})")]
    InsufficientStock { item: String, requested: u64 },

    /// Storage I/O failure or deadline expiry.
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Stable, machine-readable error category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    Forbidden,
    NotFound,
    InvalidState,
    Conflict,
    InsufficientStock,
    PersistenceError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InsufficientStock => "insufficient_stock",
            ErrorKind::PersistenceError => "persistence_error",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_stock(item: impl Into<String>, requested: u64) -> Self {
        Self::InsufficientStock {
            item: item.into(),
            requested,
        }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::ValidationError,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidState(_) => ErrorKind::InvalidState,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            DomainError::Persistence(_) => ErrorKind::PersistenceError,
        }
    }

    /// Append `context` to the message. `InsufficientStock` has a fixed
    /// shape and is returned unchanged.
    pub fn annotate(self, context: impl core::fmt::Display) -> Self {
        match self {
            DomainError::Validation(msg) => DomainError::Validation(format!("{msg}; {context}")),
            DomainError::Forbidden(msg) => DomainError::Forbidden(format!("{msg}; {context}")),
            DomainError::NotFound(msg) => DomainError::NotFound(format!("{msg}; {context}")),
            DomainError::InvalidState(msg) => {
                DomainError::InvalidState(format!("{msg}; {context}"))
            }
            DomainError::Conflict(msg) => DomainError::Conflict(format!("{msg}; {context}")),
            DomainError::Persistence(msg) => DomainError::Persistence(format!("{msg}; {context}")),
            e @ DomainError::InsufficientStock { .. } => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable_codes() {
        assert_eq!(DomainError::validation("x").kind().as_str(), "validation_error");
        assert_eq!(DomainError::conflict("x").kind().as_str(), "conflict");
        assert_eq!(
            DomainError::insufficient_stock("SKU-1", 4).kind().as_str(),
            "insufficient_stock"
        );
        assert_eq!(DomainError::persistence("x").kind().as_str(), "persistence_error");
    }

    #[test]
    fn insufficient_stock_names_the_item() {
        let err = DomainError::insufficient_stock("SKU-42", 10);
        assert_eq!(err.to_string(), "insufficient stock for SKU-42 (requested 10)");
    }

    #[test]
    fn annotate_keeps_kind_and_appends_context() {
        let err = DomainError::persistence("store unavailable")
            .annotate("stock already returned for [p1]");
        assert_eq!(err.kind(), ErrorKind::PersistenceError);
        assert_eq!(
            err.to_string(),
            "persistence error: store unavailable; stock already returned for [p1]"
        );

        let short = DomainError::insufficient_stock("SKU-1", 2);
        assert_eq!(short.clone().annotate("ignored"), short);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InsufficientStock).unwrap();
        assert_eq!(json, "\"insufficient_stock\"");
    }
}
