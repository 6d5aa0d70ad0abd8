//! Store Info Model

use serde::{Deserialize, Serialize};

/// Store information entity
///
/// `opening_time`/`closing_time` are "HH:MM" strings in the store's local
/// timezone. When both are set and closing < opening the store trades
/// overnight and its business day crosses midnight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreInfo {
    pub id: String,
    /// Unique store code (QR payloads and admin login reference this)
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Service charge in currency units, applied by the billing surface
    pub service_charge: Option<i64>,
    /// Per-table seating charge in currency units
    pub table_charge: Option<i64>,
    /// Opening time "HH:MM"
    pub opening_time: Option<String>,
    /// Closing time "HH:MM" (may be earlier than opening for overnight trading)
    pub closing_time: Option<String>,
}

/// Update store info payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreInfoUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub service_charge: Option<i64>,
    pub table_charge: Option<i64>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
}
