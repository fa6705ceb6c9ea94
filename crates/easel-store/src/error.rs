//! Error types for easel-store
//!
//! This module provides error types for storage operations.

use thiserror::Error;

/// Storage error type
#[derive(Debug, Error)]
pub enum Error {
    /// The store's byte quota would be exceeded by this write
    #[error("storage quota exceeded: {used} of {limit} bytes in use")]
    QuotaExceeded {
        /// Bytes currently stored
        used: u64,
        /// Configured quota in bytes
        limit: u64,
    },

    /// A single value exceeds its size ceiling
    #[error("value too large: {size} bytes (limit {limit})")]
    TooLarge {
        /// Size of the rejected value in bytes
        size: u64,
        /// Per-value limit in bytes
        limit: u64,
    },

    /// Input rejected before any state change
    #[error("validation error: {0}")]
    Validation(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Canvas-level error surfaced through storage
    #[error("canvas error: {0}")]
    Canvas(#[from] easel_canvas::Error),
}

impl Error {
    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Whether the error means the store is out of space
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Get error code for user-facing messages
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::TooLarge { .. } => "too_large",
            Self::Validation(_) => "validation_error",
            Self::Database(_) => "database_error",
            Self::Serialization(_) => "serialization_error",
            Self::Canvas(_) => "canvas_error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::QuotaExceeded {
            used: 100,
            limit: 50,
        };
        assert_eq!(err.code(), "quota_exceeded");
        assert!(err.is_quota_exceeded());
        assert!(!Error::validation("bad").is_quota_exceeded());
    }

    #[test]
    fn test_too_large_display() {
        let err = Error::TooLarge {
            size: 6_000_000,
            limit: 5_000_000,
        };
        assert!(err.to_string().contains("6000000"));
    }
}
