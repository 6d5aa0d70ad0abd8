//! In-memory data store
//!
//! Reference implementation of the [`DataStore`] seam, used by the test
//! suites. Mutations fan out [`ChangeEvent`]s over a broadcast channel
//! just like the hosted backend's push channel.
//!
//! Test doubles need to misbehave on demand, so the store also carries
//! scripted fault injection: [`MemoryStore::fail_next`] makes one upcoming
//! write fail, [`MemoryStore::fail_subscribes`] rejects the next N
//! subscription attempts, and [`MemoryStore::disconnect_feed`] closes the
//! change channel under every live subscriber.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use shared::models::{
    DiningTable, MenuCategory, MenuItem, Order, OrderItem, Staff, StaffDrink, StoreInfo,
};
use tokio::sync::broadcast;

use super::{ChangeEvent, DataStore, RecordKind, StoreError, StoreResult};

/// Change channel capacity; dropped events surface as `Lagged` and trigger
/// a full re-fetch on the subscriber side, so a small buffer is fine.
const FEED_CHANNEL_CAPACITY: usize = 256;

/// Write operations that can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    InsertOrder,
    InsertOrderItem,
    InsertStaffDrink,
    UpdateOrder,
    DeleteOrder,
}

#[derive(Default)]
struct Inner {
    store_info: HashMap<String, StoreInfo>,
    tables: HashMap<String, DiningTable>,
    staff: HashMap<String, Staff>,
    categories: HashMap<String, MenuCategory>,
    menu_items: HashMap<String, MenuItem>,
    orders: HashMap<String, Order>,
    order_items: HashMap<String, OrderItem>,
    staff_drinks: HashMap<String, StaffDrink>,
}

/// In-memory store with a broadcast change feed
pub struct MemoryStore {
    inner: RwLock<Inner>,
    feed_tx: RwLock<broadcast::Sender<ChangeEvent>>,
    faults: Mutex<HashMap<FaultPoint, u32>>,
    failing_subscribes: AtomicU32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (feed_tx, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(Inner::default()),
            feed_tx: RwLock::new(feed_tx),
            faults: Mutex::new(HashMap::new()),
            failing_subscribes: AtomicU32::new(0),
        }
    }

    // ========== Test Hooks ==========

    /// Make the next write at `point` fail with a backend error
    pub fn fail_next(&self, point: FaultPoint) {
        *self.faults.lock().entry(point).or_insert(0) += 1;
    }

    /// Reject the next `count` subscription attempts
    pub fn fail_subscribes(&self, count: u32) {
        self.failing_subscribes.store(count, Ordering::SeqCst);
    }

    /// Close the change channel under all current subscribers
    ///
    /// Live receivers observe `RecvError::Closed`; later subscribe calls
    /// get a fresh channel.
    pub fn disconnect_feed(&self) {
        let (feed_tx, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        *self.feed_tx.write() = feed_tx;
    }

    fn trip(&self, point: FaultPoint) -> StoreResult<()> {
        let mut faults = self.faults.lock();
        match faults.get_mut(&point) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    faults.remove(&point);
                }
                Err(StoreError::Backend(format!("injected fault at {point:?}")))
            }
            None => Ok(()),
        }
    }

    fn emit(&self, kind: RecordKind, store_id: Option<String>) {
        // No subscribers is fine
        let _ = self.feed_tx.read().send(ChangeEvent { kind, store_id });
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    // ========== Store Info ==========

    async fn store_info(&self, store_id: &str) -> StoreResult<Option<StoreInfo>> {
        Ok(self.inner.read().store_info.get(store_id).cloned())
    }

    async fn update_store_info(&self, info: StoreInfo) -> StoreResult<StoreInfo> {
        self.inner
            .write()
            .store_info
            .insert(info.id.clone(), info.clone());
        Ok(info)
    }

    // ========== Dining Tables ==========

    async fn table(&self, id: &str) -> StoreResult<Option<DiningTable>> {
        Ok(self.inner.read().tables.get(id).cloned())
    }

    async fn tables_by_store(&self, store_id: &str) -> StoreResult<Vec<DiningTable>> {
        Ok(self
            .inner
            .read()
            .tables
            .values()
            .filter(|t| t.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn insert_table(&self, table: DiningTable) -> StoreResult<DiningTable> {
        self.inner
            .write()
            .tables
            .insert(table.id.clone(), table.clone());
        Ok(table)
    }

    async fn update_table(&self, table: DiningTable) -> StoreResult<DiningTable> {
        let mut inner = self.inner.write();
        if !inner.tables.contains_key(&table.id) {
            return Err(StoreError::NotFound(format!("table {}", table.id)));
        }
        inner.tables.insert(table.id.clone(), table.clone());
        Ok(table)
    }

    async fn delete_table(&self, id: &str) -> StoreResult<bool> {
        Ok(self.inner.write().tables.remove(id).is_some())
    }

    // ========== Staff ==========

    async fn staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        Ok(self.inner.read().staff.get(id).cloned())
    }

    async fn staff_by_store(&self, store_id: &str) -> StoreResult<Vec<Staff>> {
        Ok(self
            .inner
            .read()
            .staff
            .values()
            .filter(|s| s.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn insert_staff(&self, staff: Staff) -> StoreResult<Staff> {
        self.inner
            .write()
            .staff
            .insert(staff.id.clone(), staff.clone());
        Ok(staff)
    }

    async fn update_staff(&self, staff: Staff) -> StoreResult<Staff> {
        let mut inner = self.inner.write();
        if !inner.staff.contains_key(&staff.id) {
            return Err(StoreError::NotFound(format!("staff {}", staff.id)));
        }
        inner.staff.insert(staff.id.clone(), staff.clone());
        Ok(staff)
    }

    // ========== Menu ==========

    async fn category(&self, id: &str) -> StoreResult<Option<MenuCategory>> {
        Ok(self.inner.read().categories.get(id).cloned())
    }

    async fn categories_by_store(&self, store_id: &str) -> StoreResult<Vec<MenuCategory>> {
        Ok(self
            .inner
            .read()
            .categories
            .values()
            .filter(|c| c.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn insert_category(&self, category: MenuCategory) -> StoreResult<MenuCategory> {
        self.inner
            .write()
            .categories
            .insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn update_category(&self, category: MenuCategory) -> StoreResult<MenuCategory> {
        let mut inner = self.inner.write();
        if !inner.categories.contains_key(&category.id) {
            return Err(StoreError::NotFound(format!("category {}", category.id)));
        }
        inner.categories.insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: &str) -> StoreResult<bool> {
        Ok(self.inner.write().categories.remove(id).is_some())
    }

    async fn menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(self.inner.read().menu_items.get(id).cloned())
    }

    async fn menu_items_by_category(&self, category_id: &str) -> StoreResult<Vec<MenuItem>> {
        Ok(self
            .inner
            .read()
            .menu_items
            .values()
            .filter(|m| m.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn menu_items_by_ids(&self, ids: &[String]) -> StoreResult<Vec<MenuItem>> {
        let inner = self.inner.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.menu_items.get(id))
            .cloned()
            .collect())
    }

    async fn insert_menu_item(&self, item: MenuItem) -> StoreResult<MenuItem> {
        self.inner
            .write()
            .menu_items
            .insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update_menu_item(&self, item: MenuItem) -> StoreResult<MenuItem> {
        let mut inner = self.inner.write();
        if !inner.menu_items.contains_key(&item.id) {
            return Err(StoreError::NotFound(format!("menu item {}", item.id)));
        }
        inner.menu_items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<bool> {
        Ok(self.inner.write().menu_items.remove(id).is_some())
    }

    // ========== Orders ==========

    async fn order(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.inner.read().orders.get(id).cloned())
    }

    async fn orders_by_store(&self, store_id: &str) -> StoreResult<Vec<Order>> {
        Ok(self
            .inner
            .read()
            .orders
            .values()
            .filter(|o| o.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn orders_by_table(&self, table_id: &str) -> StoreResult<Vec<Order>> {
        Ok(self
            .inner
            .read()
            .orders
            .values()
            .filter(|o| o.table_id == table_id)
            .cloned()
            .collect())
    }

    async fn insert_order(&self, order: Order) -> StoreResult<Order> {
        self.trip(FaultPoint::InsertOrder)?;
        self.inner
            .write()
            .orders
            .insert(order.id.clone(), order.clone());
        self.emit(RecordKind::Order, Some(order.store_id.clone()));
        Ok(order)
    }

    async fn update_order(&self, order: Order) -> StoreResult<Order> {
        self.trip(FaultPoint::UpdateOrder)?;
        {
            let mut inner = self.inner.write();
            if !inner.orders.contains_key(&order.id) {
                return Err(StoreError::NotFound(format!("order {}", order.id)));
            }
            inner.orders.insert(order.id.clone(), order.clone());
        }
        self.emit(RecordKind::Order, Some(order.store_id.clone()));
        Ok(order)
    }

    async fn delete_order(&self, id: &str) -> StoreResult<bool> {
        self.trip(FaultPoint::DeleteOrder)?;
        let removed = self.inner.write().orders.remove(id);
        if let Some(order) = &removed {
            self.emit(RecordKind::Order, Some(order.store_id.clone()));
        }
        Ok(removed.is_some())
    }

    // ========== Order Items ==========

    async fn order_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        Ok(self
            .inner
            .read()
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn insert_order_item(&self, item: OrderItem) -> StoreResult<OrderItem> {
        self.trip(FaultPoint::InsertOrderItem)?;
        self.inner
            .write()
            .order_items
            .insert(item.id.clone(), item.clone());
        self.emit(RecordKind::OrderItem, None);
        Ok(item)
    }

    async fn delete_order_item(&self, id: &str) -> StoreResult<bool> {
        let removed = self.inner.write().order_items.remove(id).is_some();
        if removed {
            self.emit(RecordKind::OrderItem, None);
        }
        Ok(removed)
    }

    // ========== Staff Drinks ==========

    async fn insert_staff_drink(&self, drink: StaffDrink) -> StoreResult<StaffDrink> {
        self.trip(FaultPoint::InsertStaffDrink)?;
        self.inner
            .write()
            .staff_drinks
            .insert(drink.id.clone(), drink.clone());
        Ok(drink)
    }

    async fn staff_drinks_in_range(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<StaffDrink>> {
        let inner = self.inner.read();
        Ok(inner
            .staff_drinks
            .values()
            .filter(|d| d.drink_date >= from && d.drink_date <= to)
            .filter(|d| {
                inner
                    .staff
                    .get(&d.staff_id)
                    .is_some_and(|s| s.store_id == store_id)
            })
            .cloned()
            .collect())
    }

    async fn delete_staff_drink(&self, id: &str) -> StoreResult<bool> {
        Ok(self.inner.write().staff_drinks.remove(id).is_some())
    }

    // ========== Change Feed ==========

    fn subscribe(&self) -> StoreResult<broadcast::Receiver<ChangeEvent>> {
        let failing = &self.failing_subscribes;
        if failing
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Connection("injected subscribe failure".into()));
        }
        Ok(self.feed_tx.read().subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, store_id: &str) -> Order {
        Order {
            id: id.into(),
            store_id: store_id.into(),
            table_id: "table-1".into(),
            status: Default::default(),
            total_amount: 0,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_mutations_emit_change_events() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe().unwrap();

        store.insert_order(order("o1", "s1")).await.unwrap();
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, RecordKind::Order);
        assert_eq!(ev.store_id.as_deref(), Some("s1"));

        store
            .insert_order_item(OrderItem {
                id: "i1".into(),
                order_id: "o1".into(),
                menu_item_id: "m1".into(),
                quantity: 1,
                price_at_time: 500,
                is_staff_drink: false,
                staff_id: None,
            })
            .await
            .unwrap();
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, RecordKind::OrderItem);
        assert_eq!(ev.store_id, None);
    }

    #[tokio::test]
    async fn test_fault_injection_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next(FaultPoint::InsertOrder);

        assert!(store.insert_order(order("o1", "s1")).await.is_err());
        assert!(store.insert_order(order("o1", "s1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_subscribe_failures_count_down() {
        let store = MemoryStore::new();
        store.fail_subscribes(2);
        assert!(store.subscribe().is_err());
        assert!(store.subscribe().is_err());
        assert!(store.subscribe().is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_feed_closes_subscribers() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe().unwrap();
        store.disconnect_feed();
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
