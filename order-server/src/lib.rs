//! Order server core for the QR table-ordering system
//!
//! Customers scan a per-table QR code, browse the menu and place orders;
//! staff drive those orders through their lifecycle from an admin console
//! that stays synchronized through a realtime change feed.
//!
//! - **calendar**: business-day boundary math for overnight trading
//! - **db**: generic data-store seam, in-memory reference store, typed
//!   repositories
//! - **orders**: pricing snapshot at creation, status machine, checkout
//! - **reporting**: pure aggregation for dashboard and sales reports
//! - **realtime**: reconnecting open-order feed with capped backoff
//!
//! # Data Flow
//!
//! ```text
//! place order  → OrderService::create_order → order + items (+ staff drinks)
//! status click → OrderService::update_status → validated transition
//! checkout     → OrderService::complete_table → bulk completion
//! dashboard    → calendar bounds → OrderRepository → reporting::aggregate
//! admin console→ RealtimeOrderFeed → change event → re-fetch → render
//! ```

pub mod calendar;
pub mod db;
pub mod logging;
pub mod orders;
pub mod realtime;
pub mod reporting;

// Re-exports
pub use db::{ChangeEvent, DataStore, RecordKind, memory::MemoryStore};
pub use orders::OrderService;
pub use realtime::{ConnectionState, FeedEvent, FeedNotice, RealtimeOrderFeed};
