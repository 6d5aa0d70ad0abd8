//! Staff Drink Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Staff drink record
///
/// One row per order item flagged as a staff drink. `drink_date` is the
/// business date the drink is attributed to; for overnight trading an
/// order placed at 01:30 still lands on the previous calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffDrink {
    pub id: String,
    pub staff_id: String,
    pub order_item_id: String,
    pub drink_date: NaiveDate,
}

/// Per-staff drink tally for a business date or date range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffDrinkTally {
    pub staff_id: String,
    pub staff_name: String,
    pub drink_count: i64,
}
