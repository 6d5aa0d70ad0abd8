//! Staff Model

use serde::{Deserialize, Serialize};

/// Staff member entity
///
/// Deletion is logical: `deleted_at` is set and `is_active` flipped off,
/// so historic staff-drink rows keep resolving. Soft-deleted staff are
/// excluded from listings and rejected for further updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub staff_code: Option<String>,
    pub is_active: bool,
    /// Logical delete marker (Unix millis)
    pub deleted_at: Option<i64>,
}

impl Staff {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffCreate {
    pub store_id: String,
    pub name: String,
    pub staff_code: Option<String>,
}

/// Update staff payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub staff_code: Option<String>,
    pub is_active: Option<bool>,
}
