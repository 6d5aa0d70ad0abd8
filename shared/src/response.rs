//! Action response types
//!
//! UI-facing actions return a success flag plus error description rather
//! than raising across the core/UI boundary.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Unified action result envelope
///
/// ```json
/// { "success": true, "data": { ... } }
/// { "success": false, "error": "Order not found: order:abc" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, AppError>> for ActionResult<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::error(e.to_string()),
        }
    }
}
