//! Shared error definitions for registry primitives.

use thiserror::Error;

/// Result alias used throughout the registry SDK.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or deducing registry primitives.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation configuration failed validation.
    #[error("invalid operation: {reason}")]
    InvalidOperation {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Application manifest failed validation.
    #[error("invalid application manifest: {reason}")]
    InvalidManifest {
        /// Human-readable reason for rejection.
        reason: String,
    },
}

impl Error {
    /// Convenience constructor for operation validation failures.
    #[must_use]
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for manifest validation failures.
    #[must_use]
    pub fn invalid_manifest(reason: impl Into<String>) -> Self {
        Self::InvalidManifest {
            reason: reason.into(),
        }
    }
}
