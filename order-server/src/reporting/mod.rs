//! Sales reporting
//!
//! Pure reduction of a time-bounded order set into the daily dashboard
//! numbers. The repository fetches [`ReportOrder`]s for a business-day
//! window; [`aggregate`] folds them with no further I/O, so the same
//! input always yields the same summary.
//!
//! Customer counting is a heuristic: a table has no explicit "party
//! left" signal, so consecutive orders on one table are treated as the
//! same party until a gap longer than [`SESSION_GAP_MS`] splits them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;

/// Gap between two orders on the same table beyond which they are
/// counted as separate parties (2 hours)
pub const SESSION_GAP_MS: i64 = 2 * 60 * 60 * 1000;

/// Default length of the recent-orders strip
pub const DEFAULT_RECENT_LIMIT: usize = 5;

// ========== Input ==========

/// Order as fetched for reporting, with line detail resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOrder {
    pub id: String,
    pub table_id: String,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub created_at: i64,
    pub lines: Vec<ReportLine>,
}

/// Order line with the menu lookups already joined in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub category_id: String,
    pub quantity: i32,
    pub price_at_time: i64,
    pub is_staff_drink: bool,
    pub staff_id: Option<String>,
}

/// Which order statuses contribute to the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportScope {
    /// Only completed orders
    Completed,
    /// Everything except cancelled orders
    #[default]
    NonCancelled,
    /// All orders regardless of status
    All,
}

impl ReportScope {
    fn includes(self, status: OrderStatus) -> bool {
        match self {
            ReportScope::Completed => status == OrderStatus::Completed,
            ReportScope::NonCancelled => status != OrderStatus::Cancelled,
            ReportScope::All => true,
        }
    }
}

/// Reporting knobs that vary per store
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Category whose lines count as drinks
    pub drink_category_id: String,
    pub scope: ReportScope,
    pub recent_limit: usize,
}

impl ReportConfig {
    pub fn new(drink_category_id: impl Into<String>) -> Self {
        Self {
            drink_category_id: drink_category_id.into(),
            scope: ReportScope::default(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

// ========== Output ==========

/// Aggregated dashboard figures for one business day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Sum of order totals, integer currency units
    pub total_sales: i64,
    pub order_count: usize,
    /// Drink units sold, staff drinks included
    pub drink_count: i64,
    /// Estimated parties served, from the per-table session heuristic
    pub customer_count: usize,
    /// Per-item sales, staff drinks excluded, revenue descending
    pub item_sales: Vec<ItemSale>,
    /// Newest orders first, capped at `recent_limit`
    pub recent_orders: Vec<RecentOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSale {
    pub menu_item_name: String,
    pub quantity: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentOrder {
    pub id: String,
    pub table_id: String,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub created_at: i64,
}

// ========== Aggregation ==========

/// Fold a set of orders into a [`SalesSummary`]
pub fn aggregate(orders: &[ReportOrder], config: &ReportConfig) -> SalesSummary {
    let scoped: Vec<&ReportOrder> = orders
        .iter()
        .filter(|o| config.scope.includes(o.status))
        .collect();

    let total_sales = scoped.iter().map(|o| o.total_amount).sum();
    let order_count = scoped.len();
    let drink_count = count_drinks(&scoped, &config.drink_category_id);
    let customer_count = count_sessions(&scoped);
    let item_sales = rank_item_sales(&scoped);
    let recent_orders = recent(&scoped, config.recent_limit);

    SalesSummary {
        total_sales,
        order_count,
        drink_count,
        customer_count,
        item_sales,
        recent_orders,
    }
}

/// Drink units across all lines in the drink category, staff drinks
/// included since they leave the cellar either way
fn count_drinks(orders: &[&ReportOrder], drink_category_id: &str) -> i64 {
    orders
        .iter()
        .flat_map(|o| &o.lines)
        .filter(|l| l.category_id == drink_category_id)
        .map(|l| i64::from(l.quantity))
        .sum()
}

/// Per-table session count
///
/// Orders on one table are sorted by creation time; each gap strictly
/// greater than [`SESSION_GAP_MS`] starts a new session.
fn count_sessions(orders: &[&ReportOrder]) -> usize {
    let mut by_table: HashMap<&str, Vec<i64>> = HashMap::new();
    for order in orders {
        by_table
            .entry(order.table_id.as_str())
            .or_default()
            .push(order.created_at);
    }

    let mut sessions = 0;
    for times in by_table.values_mut() {
        times.sort_unstable();
        sessions += 1;
        for pair in times.windows(2) {
            if pair[1] - pair[0] > SESSION_GAP_MS {
                sessions += 1;
            }
        }
    }
    sessions
}

/// Sales per menu item, staff drinks excluded, revenue descending with
/// name as the tie-break
fn rank_item_sales(orders: &[&ReportOrder]) -> Vec<ItemSale> {
    let mut by_name: HashMap<&str, (i64, i64)> = HashMap::new();
    for line in orders.iter().flat_map(|o| &o.lines) {
        if line.is_staff_drink {
            continue;
        }
        let entry = by_name.entry(line.menu_item_name.as_str()).or_default();
        entry.0 += i64::from(line.quantity);
        entry.1 += line.price_at_time * i64::from(line.quantity);
    }

    let mut sales: Vec<ItemSale> = by_name
        .into_iter()
        .map(|(name, (quantity, revenue))| ItemSale {
            menu_item_name: name.to_string(),
            quantity,
            revenue,
        })
        .collect();
    sales.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.menu_item_name.cmp(&b.menu_item_name))
    });
    sales
}

fn recent(orders: &[&ReportOrder], limit: usize) -> Vec<RecentOrder> {
    let mut sorted: Vec<&&ReportOrder> = orders.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
        .into_iter()
        .take(limit)
        .map(|o| RecentOrder {
            id: o.id.clone(),
            table_id: o.table_id.clone(),
            status: o.status,
            total_amount: o.total_amount,
            created_at: o.created_at,
        })
        .collect()
}
