//! Unified error handling
//!
//! Application-level error taxonomy shared by every action:
//!
//! | Variant | Meaning | Retry policy |
//! |---------|---------|--------------|
//! | `Validation` | malformed input, illegal status transition | never retried |
//! | `NotFound` | referenced record does not exist | terminal for the call |
//! | `Conflict` | uniqueness violation (duplicate table number) | never retried |
//! | `PartialWrite` | multi-row write failed and compensation also failed | operator attention |
//! | `Database` | the backing store rejected an operation | caller may retry |
//! | `Internal` | unexpected state | caller may retry |
//!
//! Realtime connectivity failures are deliberately absent: channel errors
//! never surface as `AppError`, they drive the feed's reconnect machine.

use thiserror::Error;

/// Application error enum
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Partial write failure: {0}")]
    PartialWrite(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// True when retrying the same call cannot succeed
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_)
        )
    }
}
