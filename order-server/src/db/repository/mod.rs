//! Repository Module
//!
//! Typed CRUD wrappers over the [`DataStore`](super::DataStore) seam.
//! Business rules that belong to the write path live here: per-store
//! uniqueness of table numbers, the logical-delete policy for staff,
//! grouping the menu for the customer page.

// Location
pub mod dining_table;

// People
pub mod staff;

// Menu
pub mod menu;

// Orders
pub mod order;
pub mod staff_drink;

// Store
pub mod store_info;

// Re-exports
pub use dining_table::DiningTableRepository;
pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use staff::StaffRepository;
pub use staff_drink::StaffDrinkRepository;
pub use store_info::StoreInfoRepository;

/// Generate a fresh record id
///
/// The hosted backend assigns UUIDs; the in-process write path does the
/// same so compensating deletes can reference rows it just created.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
