//! Data-store seam
//!
//! Persistence, filtering and change notification are delegated to a
//! hosted backend; this module pins down the slice of it the core needs as
//! the [`DataStore`] trait. Repositories layer typed validation and
//! business rules on top, so everything above this boundary works on fully
//! validated domain entities, never raw records.
//!
//! [`memory::MemoryStore`] is the in-process reference implementation used
//! by the test suites.

pub mod memory;
pub mod repository;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::AppError;
use shared::models::{
    DiningTable, MenuCategory, MenuItem, Order, OrderItem, Staff, StaffDrink, StoreInfo,
};
use thiserror::Error;
use tokio::sync::broadcast;

/// Store-level error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Connection(msg) | StoreError::Backend(msg) => AppError::Database(msg),
        }
    }
}

/// Record kinds carrying change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Order,
    OrderItem,
}

/// Change notification pushed on every order/order-item mutation
///
/// `store_id` is set for order changes (server-side filtering); order-item
/// changes are store-agnostic and subscribers re-fetch regardless.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: RecordKind,
    pub store_id: Option<String>,
}

/// Generic persistent-store interface
///
/// Typed read-by-filter / insert / update / delete plus a change-event
/// subscription. Inserts and updates take complete records; id generation
/// happens in the repositories.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    // ========== Store Info ==========
    async fn store_info(&self, store_id: &str) -> StoreResult<Option<StoreInfo>>;
    async fn update_store_info(&self, info: StoreInfo) -> StoreResult<StoreInfo>;

    // ========== Dining Tables ==========
    async fn table(&self, id: &str) -> StoreResult<Option<DiningTable>>;
    async fn tables_by_store(&self, store_id: &str) -> StoreResult<Vec<DiningTable>>;
    async fn insert_table(&self, table: DiningTable) -> StoreResult<DiningTable>;
    async fn update_table(&self, table: DiningTable) -> StoreResult<DiningTable>;
    async fn delete_table(&self, id: &str) -> StoreResult<bool>;

    // ========== Staff ==========
    async fn staff(&self, id: &str) -> StoreResult<Option<Staff>>;
    async fn staff_by_store(&self, store_id: &str) -> StoreResult<Vec<Staff>>;
    async fn insert_staff(&self, staff: Staff) -> StoreResult<Staff>;
    async fn update_staff(&self, staff: Staff) -> StoreResult<Staff>;

    // ========== Menu ==========
    async fn category(&self, id: &str) -> StoreResult<Option<MenuCategory>>;
    async fn categories_by_store(&self, store_id: &str) -> StoreResult<Vec<MenuCategory>>;
    async fn insert_category(&self, category: MenuCategory) -> StoreResult<MenuCategory>;
    async fn update_category(&self, category: MenuCategory) -> StoreResult<MenuCategory>;
    async fn delete_category(&self, id: &str) -> StoreResult<bool>;

    async fn menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>>;
    async fn menu_items_by_category(&self, category_id: &str) -> StoreResult<Vec<MenuItem>>;
    async fn menu_items_by_ids(&self, ids: &[String]) -> StoreResult<Vec<MenuItem>>;
    async fn insert_menu_item(&self, item: MenuItem) -> StoreResult<MenuItem>;
    async fn update_menu_item(&self, item: MenuItem) -> StoreResult<MenuItem>;
    async fn delete_menu_item(&self, id: &str) -> StoreResult<bool>;

    // ========== Orders ==========
    async fn order(&self, id: &str) -> StoreResult<Option<Order>>;
    async fn orders_by_store(&self, store_id: &str) -> StoreResult<Vec<Order>>;
    async fn orders_by_table(&self, table_id: &str) -> StoreResult<Vec<Order>>;
    async fn insert_order(&self, order: Order) -> StoreResult<Order>;
    async fn update_order(&self, order: Order) -> StoreResult<Order>;
    async fn delete_order(&self, id: &str) -> StoreResult<bool>;

    // ========== Order Items ==========
    async fn order_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>>;
    async fn insert_order_item(&self, item: OrderItem) -> StoreResult<OrderItem>;
    async fn delete_order_item(&self, id: &str) -> StoreResult<bool>;

    // ========== Staff Drinks ==========
    async fn insert_staff_drink(&self, drink: StaffDrink) -> StoreResult<StaffDrink>;
    async fn staff_drinks_in_range(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<StaffDrink>>;
    async fn delete_staff_drink(&self, id: &str) -> StoreResult<bool>;

    // ========== Change Feed ==========
    /// Open a change-event subscription
    ///
    /// Fails with [`StoreError::Connection`] when the channel cannot be
    /// established; the realtime feed turns that into its backoff cycle.
    fn subscribe(&self) -> StoreResult<broadcast::Receiver<ChangeEvent>>;
}
