//! Data models
//!
//! Shared between the order server and its UI callers. All IDs are
//! `String` record ids assigned by the backing store (UUID v4).

pub mod dining_table;
pub mod menu;
pub mod order;
pub mod staff;
pub mod staff_drink;
pub mod store_info;

// Re-exports
pub use dining_table::*;
pub use menu::*;
pub use order::*;
pub use staff::*;
pub use staff_drink::*;
pub use store_info::*;
