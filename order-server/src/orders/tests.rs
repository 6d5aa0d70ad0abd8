//! Order lifecycle tests against the in-memory store

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{
    DiningTable, MenuCategory, MenuItem, OrderItemRequest, OrderStatus, Staff,
};
use shared::AppError;

use crate::db::memory::{FaultPoint, MemoryStore};
use crate::db::repository::StaffDrinkRepository;
use crate::db::DataStore;
use crate::orders::OrderService;

const STORE: &str = "store-1";
const TABLE: &str = "table-1";
const BEER: &str = "menu-beer";
const WINE: &str = "menu-wine";

fn drink_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    store
        .insert_table(DiningTable {
            id: TABLE.into(),
            store_id: STORE.into(),
            table_number: "1".into(),
            is_active: true,
            qr_code: None,
        })
        .await
        .unwrap();

    store
        .insert_category(MenuCategory {
            id: "cat-drinks".into(),
            store_id: STORE.into(),
            name: "Drinks".into(),
            display_order: 1,
        })
        .await
        .unwrap();

    for (id, name, price) in [(BEER, "Beer", 500_i64), (WINE, "Wine", 300)] {
        store
            .insert_menu_item(MenuItem {
                id: id.into(),
                category_id: "cat-drinks".into(),
                name: name.into(),
                price,
                description: None,
                image_url: None,
                is_available: true,
            })
            .await
            .unwrap();
    }

    store
        .insert_staff(Staff {
            id: "staff-1".into(),
            store_id: STORE.into(),
            name: "Alice".into(),
            staff_code: None,
            is_active: true,
            deleted_at: None,
        })
        .await
        .unwrap();

    store
}

fn line(menu_item_id: &str, quantity: i32) -> OrderItemRequest {
    OrderItemRequest {
        menu_item_id: menu_item_id.into(),
        quantity,
        is_staff_drink: false,
        staff_id: None,
    }
}

fn staff_line(menu_item_id: &str, staff_id: &str) -> OrderItemRequest {
    OrderItemRequest {
        menu_item_id: menu_item_id.into(),
        quantity: 1,
        is_staff_drink: true,
        staff_id: Some(staff_id.into()),
    }
}

#[tokio::test]
async fn test_create_order_snapshots_prices() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    let created = service
        .create_order(TABLE, &[line(BEER, 2), line(WINE, 1)], drink_date())
        .await
        .unwrap();
    assert_eq!(created.total_amount, 1300);

    // A later price change must not touch the stored snapshot
    let mut beer = store.menu_item(BEER).await.unwrap().unwrap();
    beer.price = 9999;
    store.update_menu_item(beer).await.unwrap();

    let order = store.order(&created.order_id).await.unwrap().unwrap();
    assert_eq!(order.total_amount, 1300);
    assert_eq!(order.status, OrderStatus::Pending);

    let items = store.order_items(&created.order_id).await.unwrap();
    let beer_line = items.iter().find(|i| i.menu_item_id == BEER).unwrap();
    assert_eq!(beer_line.price_at_time, 500);
    assert_eq!(beer_line.quantity, 2);
}

#[tokio::test]
async fn test_create_order_validation() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    let err = service.create_order(TABLE, &[], drink_date()).await;
    assert!(matches!(err, Err(AppError::Validation(_))));

    let err = service
        .create_order(TABLE, &[line(BEER, 0)], drink_date())
        .await;
    assert!(matches!(err, Err(AppError::Validation(_))));

    let err = service
        .create_order(TABLE, &[line("menu-ghost", 1)], drink_date())
        .await;
    assert!(matches!(err, Err(AppError::Validation(_))));

    let mut bad = staff_line(BEER, "staff-1");
    bad.staff_id = None;
    let err = service.create_order(TABLE, &[bad], drink_date()).await;
    assert!(matches!(err, Err(AppError::Validation(_))));

    let err = service
        .create_order("table-ghost", &[line(BEER, 1)], drink_date())
        .await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_create_order_records_staff_drinks() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    service
        .create_order(
            TABLE,
            &[line(BEER, 1), staff_line(WINE, "staff-1")],
            drink_date(),
        )
        .await
        .unwrap();

    let drinks = store
        .staff_drinks_in_range(STORE, drink_date(), drink_date())
        .await
        .unwrap();
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0].staff_id, "staff-1");

    let tallies = StaffDrinkRepository::new(store)
        .summary(STORE, drink_date(), drink_date())
        .await
        .unwrap();
    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].staff_name, "Alice");
    assert_eq!(tallies[0].drink_count, 1);
}

#[tokio::test]
async fn test_failed_create_rolls_back_everything() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    store.fail_next(FaultPoint::InsertStaffDrink);
    let err = service
        .create_order(
            TABLE,
            &[line(BEER, 2), staff_line(WINE, "staff-1")],
            drink_date(),
        )
        .await;
    assert!(matches!(err, Err(AppError::Database(_))));

    // Compensation removed the order and every line already written
    assert!(store.orders_by_table(TABLE).await.unwrap().is_empty());
    let orphans = store
        .orders_by_store(STORE)
        .await
        .unwrap();
    assert!(orphans.is_empty());
    let drinks = store
        .staff_drinks_in_range(STORE, drink_date(), drink_date())
        .await
        .unwrap();
    assert!(drinks.is_empty());
}

#[tokio::test]
async fn test_failed_rollback_is_a_partial_write() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    store.fail_next(FaultPoint::InsertStaffDrink);
    store.fail_next(FaultPoint::DeleteOrder);
    let err = service
        .create_order(TABLE, &[staff_line(WINE, "staff-1")], drink_date())
        .await;
    assert!(matches!(err, Err(AppError::PartialWrite(_))));
}

#[tokio::test]
async fn test_status_flow_through_service() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    let created = service
        .create_order(TABLE, &[line(BEER, 1)], drink_date())
        .await
        .unwrap();

    let order = service.advance_status(&created.order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    let order = service.advance_status(&created.order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Processing);

    // Skipping ahead is rejected and leaves the order untouched
    let err = service
        .update_status(&created.order_id, OrderStatus::Pending)
        .await;
    assert!(matches!(err, Err(AppError::Validation(_))));
    let order = store.order(&created.order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Processing);

    let order = service
        .update_status(&created.order_id, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);

    let err = service.advance_status(&created.order_id).await;
    assert!(matches!(err, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_complete_table_finishes_open_orders() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    let first = service
        .create_order(TABLE, &[line(BEER, 1)], drink_date())
        .await
        .unwrap();
    let second = service
        .create_order(TABLE, &[line(WINE, 1)], drink_date())
        .await
        .unwrap();
    service
        .update_status(&first.order_id, OrderStatus::Cancelled)
        .await
        .unwrap();

    let completed = service.complete_table(TABLE).await.unwrap();
    assert_eq!(completed, 1);

    // Cancelled order stayed cancelled
    let order = store.order(&first.order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    let order = store.order(&second.order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_complete_table_propagates_update_failure() {
    let store = seeded_store().await;
    let service = OrderService::new(store.clone());

    service
        .create_order(TABLE, &[line(BEER, 1)], drink_date())
        .await
        .unwrap();

    store.fail_next(FaultPoint::UpdateOrder);
    let err = service.complete_table(TABLE).await;
    assert!(matches!(err, Err(AppError::Database(_))));

    let err = service.complete_table("table-ghost").await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}
