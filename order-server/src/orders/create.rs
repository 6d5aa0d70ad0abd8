//! Order creation
//!
//! Resolves current menu prices into a per-line snapshot, fixes the order
//! total, and records staff drinks against the business date. The write
//! sequence is order → items → staff drinks; the backing store offers no
//! multi-row transaction, so a failure partway triggers compensating
//! deletes of everything already written before the error is surfaced.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderItem, OrderItemRequest, OrderStatus, StaffDrink};
use shared::{AppError, AppResult};

use super::OrderService;
use crate::db::repository::new_record_id;
use crate::db::DataStore;

/// Result of a successful order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order_id: String,
    pub total_amount: i64,
}

impl<S: DataStore> OrderService<S> {
    /// Create an order for a table
    ///
    /// `drink_date` is the business date staff drinks are attributed to.
    /// Callers pass [`calendar::current_business_date`](crate::calendar::current_business_date)
    /// rather than the raw calendar date, so drinks consumed during
    /// overnight trading land on the right day.
    pub async fn create_order(
        &self,
        table_id: &str,
        items: &[OrderItemRequest],
        drink_date: NaiveDate,
    ) -> AppResult<CreatedOrder> {
        validate_requests(items)?;

        let table = self
            .store()
            .table(table_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {table_id} not found")))?;

        let price_map = self.resolve_prices(items).await?;
        let total_amount: i64 = items
            .iter()
            .map(|req| price_map[&req.menu_item_id] * i64::from(req.quantity))
            .sum();

        let order = Order {
            id: new_record_id(),
            store_id: table.store_id,
            table_id: table.id,
            status: OrderStatus::Pending,
            total_amount,
            created_at: Utc::now().timestamp_millis(),
        };
        let order = self.store().insert_order(order).await?;

        let mut written = WrittenRows::new(order.id.clone());
        match self.write_lines(&order, items, &price_map, drink_date, &mut written).await {
            Ok(()) => {
                tracing::info!(order_id = %order.id, total_amount, "Order created");
                Ok(CreatedOrder {
                    order_id: order.id,
                    total_amount,
                })
            }
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e,
                    "Order creation failed partway; rolling back");
                self.rollback(written).await?;
                Err(e)
            }
        }
    }

    async fn resolve_prices(
        &self,
        items: &[OrderItemRequest],
    ) -> AppResult<HashMap<String, i64>> {
        let ids: Vec<String> = items.iter().map(|r| r.menu_item_id.clone()).collect();
        let price_map: HashMap<String, i64> = self
            .store()
            .menu_items_by_ids(&ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m.price))
            .collect();

        for req in items {
            if !price_map.contains_key(&req.menu_item_id) {
                return Err(AppError::validation(format!(
                    "Unknown menu item: {}",
                    req.menu_item_id
                )));
            }
        }
        Ok(price_map)
    }

    async fn write_lines(
        &self,
        order: &Order,
        items: &[OrderItemRequest],
        price_map: &HashMap<String, i64>,
        drink_date: NaiveDate,
        written: &mut WrittenRows,
    ) -> AppResult<()> {
        let mut staff_drink_lines = Vec::new();

        for req in items {
            let item = OrderItem {
                id: new_record_id(),
                order_id: order.id.clone(),
                menu_item_id: req.menu_item_id.clone(),
                quantity: req.quantity,
                price_at_time: price_map[&req.menu_item_id],
                is_staff_drink: req.is_staff_drink,
                // staff_id is ignored on regular lines
                staff_id: req.is_staff_drink.then(|| req.staff_id.clone()).flatten(),
            };
            let item = self.store().insert_order_item(item).await?;
            written.item_ids.push(item.id.clone());

            if item.is_staff_drink
                && let Some(staff_id) = &item.staff_id
            {
                staff_drink_lines.push((staff_id.clone(), item.id));
            }
        }

        for (staff_id, order_item_id) in staff_drink_lines {
            let drink = StaffDrink {
                id: new_record_id(),
                staff_id,
                order_item_id,
                drink_date,
            };
            let drink = self.store().insert_staff_drink(drink).await?;
            written.staff_drink_ids.push(drink.id);
        }
        Ok(())
    }

    /// Compensating deletes, innermost rows first
    ///
    /// If compensation itself fails the order may be partially visible;
    /// that is the one state escalated as `PartialWrite`.
    async fn rollback(&self, written: WrittenRows) -> AppResult<()> {
        let mut failed = false;

        for id in &written.staff_drink_ids {
            failed |= self.store().delete_staff_drink(id).await.is_err();
        }
        for id in &written.item_ids {
            failed |= self.store().delete_order_item(id).await.is_err();
        }
        failed |= self.store().delete_order(&written.order_id).await.is_err();

        if failed {
            tracing::error!(order_id = %written.order_id, "Rollback incomplete");
            return Err(AppError::PartialWrite(format!(
                "Order {} could not be fully rolled back",
                written.order_id
            )));
        }
        Ok(())
    }
}

struct WrittenRows {
    order_id: String,
    item_ids: Vec<String>,
    staff_drink_ids: Vec<String>,
}

impl WrittenRows {
    fn new(order_id: String) -> Self {
        Self {
            order_id,
            item_ids: Vec::new(),
            staff_drink_ids: Vec::new(),
        }
    }
}

fn validate_requests(items: &[OrderItemRequest]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    for req in items {
        if req.quantity < 1 {
            return Err(AppError::validation(format!(
                "Quantity must be positive for menu item {}",
                req.menu_item_id
            )));
        }
        if req.is_staff_drink && req.staff_id.is_none() {
            return Err(AppError::validation(format!(
                "Staff drink line for menu item {} is missing staff_id",
                req.menu_item_id
            )));
        }
    }
    Ok(())
}
