//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub store_id: String,
    /// Display number, unique within the store
    pub table_number: String,
    pub is_active: bool,
    /// Opaque encoded payload pointing at the per-table ordering URL
    pub qr_code: Option<String>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub store_id: String,
    pub table_number: String,
    pub qr_code: Option<String>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub table_number: Option<String>,
    pub is_active: Option<bool>,
    pub qr_code: Option<String>,
}
