//! Order Repository
//!
//! Read-side assembly of orders: the admin console's open-order list and
//! the time-bounded order sets the reporting layer reduces. All writes go
//! through [`OrderService`](crate::orders::OrderService).

use std::collections::HashMap;
use std::sync::Arc;

use shared::AppResult;
use shared::models::{MenuItem, Order, OrderDetail, OrderLine, OrderStatus};

use crate::db::DataStore;
use crate::reporting::{ReportLine, ReportOrder};

#[derive(Clone)]
pub struct OrderRepository<S> {
    store: Arc<S>,
}

impl<S: DataStore> OrderRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Order>> {
        Ok(self.store.order(id).await?)
    }

    /// Open (non-terminal) orders for a store, newest first, with lines
    /// enriched for display
    pub async fn open_orders(&self, store_id: &str) -> AppResult<Vec<OrderDetail>> {
        let mut orders: Vec<Order> = self
            .store
            .orders_by_store(store_id)
            .await?
            .into_iter()
            .filter(|o| !o.status.is_terminal())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let table_number = match self.store.table(&order.table_id).await? {
                Some(table) => table.table_number,
                None => String::new(),
            };

            let items = self.store.order_items(&order.id).await?;
            let menu_items = self.menu_items_for(&items).await?;

            let mut lines = Vec::with_capacity(items.len());
            for item in items {
                let menu_item_name = menu_items
                    .get(&item.menu_item_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                let staff_name = match &item.staff_id {
                    Some(staff_id) => self.store.staff(staff_id).await?.map(|s| s.name),
                    None => None,
                };
                lines.push(OrderLine {
                    id: item.id,
                    menu_item_id: item.menu_item_id,
                    menu_item_name,
                    quantity: item.quantity,
                    price_at_time: item.price_at_time,
                    is_staff_drink: item.is_staff_drink,
                    staff_name,
                });
            }

            details.push(OrderDetail {
                order,
                table_number,
                items: lines,
            });
        }
        Ok(details)
    }

    /// Orders created within `[from, to]` (Unix millis, inclusive) with the
    /// line detail reporting needs; status filtering is the aggregator's
    /// concern
    pub async fn orders_in_range(
        &self,
        store_id: &str,
        from: i64,
        to: i64,
    ) -> AppResult<Vec<ReportOrder>> {
        let orders: Vec<Order> = self
            .store
            .orders_by_store(store_id)
            .await?
            .into_iter()
            .filter(|o| o.created_at >= from && o.created_at <= to)
            .collect();

        let mut report_orders = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.store.order_items(&order.id).await?;
            let menu_items = self.menu_items_for(&items).await?;

            let lines = items
                .into_iter()
                .map(|item| {
                    let (menu_item_name, category_id) = menu_items
                        .get(&item.menu_item_id)
                        .map(|m| (m.name.clone(), m.category_id.clone()))
                        .unwrap_or_default();
                    ReportLine {
                        menu_item_id: item.menu_item_id,
                        menu_item_name,
                        category_id,
                        quantity: item.quantity,
                        price_at_time: item.price_at_time,
                        is_staff_drink: item.is_staff_drink,
                        staff_id: item.staff_id,
                    }
                })
                .collect();

            report_orders.push(ReportOrder {
                id: order.id,
                table_id: order.table_id,
                status: order.status,
                total_amount: order.total_amount,
                created_at: order.created_at,
                lines,
            });
        }
        Ok(report_orders)
    }

    /// Completed orders within the window, as consumed by sales reports
    pub async fn sales_in_range(
        &self,
        store_id: &str,
        from: i64,
        to: i64,
    ) -> AppResult<Vec<ReportOrder>> {
        let mut orders = self.orders_in_range(store_id, from, to).await?;
        orders.retain(|o| o.status == OrderStatus::Completed);
        Ok(orders)
    }

    async fn menu_items_for(
        &self,
        items: &[shared::models::OrderItem],
    ) -> AppResult<HashMap<String, MenuItem>> {
        let ids: Vec<String> = items.iter().map(|i| i.menu_item_id.clone()).collect();
        Ok(self
            .store
            .menu_items_by_ids(&ids)
            .await?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect())
    }
}
