//! Shared types for the table-ordering system
//!
//! Domain entities, the error taxonomy, and the action-result envelope
//! used across the order server and its callers. Pure data, no I/O.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use error::{AppError, AppResult};
pub use response::ActionResult;
pub use serde::{Deserialize, Serialize};
