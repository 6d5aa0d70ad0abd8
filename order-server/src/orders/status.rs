//! Order status transitions
//!
//! Happy path `Pending → Accepted → Processing → Completed`, with
//! `Cancelled` reachable from any non-terminal state as an out-of-band
//! admin action. Illegal requests are validation errors, never silent
//! no-ops.

use shared::models::{Order, OrderStatus};
use shared::{AppError, AppResult};

use super::OrderService;
use crate::db::DataStore;

/// Validate that `to` is reachable from `from`
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> AppResult<()> {
    if from.is_terminal() {
        return Err(AppError::validation(format!(
            "Order is already {from:?}; no further transitions"
        )));
    }
    if to == OrderStatus::Cancelled || from.next() == Some(to) {
        return Ok(());
    }
    Err(AppError::validation(format!(
        "Illegal status transition: {from:?} -> {to:?}"
    )))
}

impl<S: DataStore> OrderService<S> {
    /// Apply a validated status transition and persist it
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        let mut order = self
            .store()
            .order(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

        validate_transition(order.status, status)?;

        order.status = status;
        let order = self.store().update_order(order).await?;
        tracing::info!(order_id = %order.id, status = ?order.status, "Order status updated");
        Ok(order)
    }

    /// Advance an order one step along the happy path
    pub async fn advance_status(&self, order_id: &str) -> AppResult<Order> {
        let order = self
            .store()
            .order(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

        let next = order.status.next().ok_or_else(|| {
            AppError::validation(format!(
                "Order is already {:?}; no further transitions",
                order.status
            ))
        })?;
        self.update_status(order_id, next).await
    }

    /// Checkout: complete every non-terminal order at a table
    ///
    /// Returns the number of orders completed. If an update fails partway
    /// the error is surfaced; a retry skips the orders already completed
    /// because they no longer pass the non-terminal filter.
    pub async fn complete_table(&self, table_id: &str) -> AppResult<u32> {
        self.store()
            .table(table_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {table_id} not found")))?;

        let open: Vec<Order> = self
            .store()
            .orders_by_table(table_id)
            .await?
            .into_iter()
            .filter(|o| !o.status.is_terminal())
            .collect();

        let mut completed = 0u32;
        for mut order in open {
            order.status = OrderStatus::Completed;
            if let Err(e) = self.store().update_order(order).await {
                tracing::error!(table_id = %table_id, completed, error = %e,
                    "Checkout failed partway; caller should retry");
                return Err(e.into());
            }
            completed += 1;
        }
        tracing::info!(table_id = %table_id, completed, "Table checked out");
        Ok(completed)
    }
}
