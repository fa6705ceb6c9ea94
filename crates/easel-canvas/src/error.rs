//! Error types for easel-canvas
//!
//! This module provides error types for canvas and snapshot operations.

use thiserror::Error;
use uuid::Uuid;

/// Canvas error type
#[derive(Debug, Error)]
pub enum Error {
    /// Element not found on the canvas
    #[error("element not found: {0}")]
    ElementNotFound(Uuid),

    /// An element with this id already exists on the canvas
    #[error("duplicate element id: {0}")]
    DuplicateId(Uuid),

    /// Operation not allowed on the background template layer
    #[error("operation not allowed on the background template")]
    BackgroundLocked,

    /// Snapshot serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Snapshot is structurally invalid (not a decode-level problem)
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl Error {
    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an invalid snapshot error
    #[must_use]
    pub fn invalid_snapshot(msg: impl Into<String>) -> Self {
        Self::InvalidSnapshot(msg.into())
    }

    /// Get error code for user-facing messages
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ElementNotFound(_) => "element_not_found",
            Self::DuplicateId(_) => "duplicate_id",
            Self::BackgroundLocked => "background_locked",
            Self::Serialization(_) => "serialization_error",
            Self::InvalidSnapshot(_) => "invalid_snapshot",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::ElementNotFound(Uuid::nil());
        assert_eq!(err.code(), "element_not_found");
        assert_eq!(Error::BackgroundLocked.code(), "background_locked");
    }

    #[test]
    fn test_error_display() {
        let err = Error::DuplicateId(Uuid::nil());
        assert!(err.to_string().contains("duplicate element id"));
    }

    #[test]
    fn test_from_serde_error() {
        let result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        let err: Error = result.unwrap_err().into();
        assert_eq!(err.code(), "serialization_error");
    }
}
