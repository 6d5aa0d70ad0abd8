//! Order Model

use serde::{Deserialize, Serialize};

/// Order status
///
/// Happy path runs `Pending → Accepted → Processing → Completed`.
/// `Cancelled` is reachable from any non-terminal state as an out-of-band
/// admin action. `Completed` and `Cancelled` have no outgoing transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// The single happy-path successor, `None` for terminal states
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Accepted),
            OrderStatus::Accepted => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// Order entity
///
/// `total_amount` is a snapshot computed once at creation from the items'
/// `price_at_time` and never recomputed from live menu prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub store_id: String,
    pub table_id: String,
    pub status: OrderStatus,
    /// Total in integer currency units, fixed at creation
    pub total_amount: i64,
    /// Creation instant (Unix millis)
    pub created_at: i64,
}

/// Order item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    pub quantity: i32,
    /// Menu price captured at order time, immune to later price edits
    pub price_at_time: i64,
    pub is_staff_drink: bool,
    /// Set iff `is_staff_drink`
    pub staff_id: Option<String>,
}

/// Customer order line request, as submitted by the menu UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub is_staff_drink: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
}

/// Order line enriched for display (admin console / realtime feed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub quantity: i32,
    pub price_at_time: i64,
    pub is_staff_drink: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
}

/// Open order with its lines and table number, as shown in the admin console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub table_number: String,
    pub items: Vec<OrderLine>,
}
