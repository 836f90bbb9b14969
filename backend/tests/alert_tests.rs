//! Alert derivation tests
//!
//! - Alerts follow stock across the threshold
//! - Tracking and threshold edits reconcile alerts
//! - Item deletion removes alerts and movements
//! - Read state of the inbox

mod common;

use shared::{AlertSeverity, ItemChanges, ListQuery, MovementType};
use uuid::Uuid;

use stock_ledger::repositories::movements;
use stock_ledger::services::inventory::AdjustStock;
use stock_ledger::services::{AlertAction, AlertService, InventoryService};
use stock_ledger::AppError;

fn adjustment(item_id: Uuid, movement_type: MovementType, quantity: i64) -> AdjustStock {
    AdjustStock {
        item_id,
        movement_type,
        quantity,
        reference: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_item_created_below_threshold_raises_alert() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 2, 10).await;

    let alerts = AlertService::new(pool.clone())
        .list_item_alerts(item.id)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    assert_eq!(alerts[0].organization_id, caller.organization_id);
}

#[tokio::test]
async fn test_alerts_are_not_deduplicated_and_clear_on_recovery() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 20, 10).await;
    let inventory = InventoryService::new(pool.clone());
    let alerts = AlertService::new(pool.clone());

    inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 15))
        .await
        .unwrap();
    inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 1))
        .await
        .unwrap();
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 2);

    inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::In, 6))
        .await
        .unwrap();
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tracking_toggle_clears_and_raises() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 1, 10).await;
    let inventory = InventoryService::new(pool.clone());
    let alerts = AlertService::new(pool.clone());
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 1);

    inventory
        .update_item(
            &caller,
            item.id,
            ItemChanges {
                track_stock: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());

    inventory
        .update_item(
            &caller,
            item.id,
            ItemChanges {
                track_stock: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_threshold_edit_reconciles() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 5, 0).await;
    let inventory = InventoryService::new(pool.clone());
    let alerts = AlertService::new(pool.clone());
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());

    inventory
        .update_item(
            &caller,
            item.id,
            ItemChanges {
                minimum_threshold: Some(8),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 1);

    // Renaming leaves alerts alone.
    inventory
        .update_item(
            &caller,
            item.id,
            ItemChanges {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 1);

    inventory
        .update_item(
            &caller,
            item.id,
            ItemChanges {
                minimum_threshold: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_item_removes_alerts_and_movements() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 10, 5).await;
    let inventory = InventoryService::new(pool.clone());
    let alerts = AlertService::new(pool.clone());

    inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 8))
        .await
        .unwrap();
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 1);

    inventory.delete_item(&caller, item.id).await.unwrap();

    assert!(matches!(
        inventory.get_item(&caller, item.id).await,
        Err(AppError::ItemNotFound)
    ));
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());
    assert!(movements::history(&pool, item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_read() {
    let pool = common::memory_pool().await;
    let org = Uuid::new_v4();
    let caller = common::admin(org);
    common::create_item(&pool, &caller, 1, 10).await;
    common::create_item(&pool, &caller, 2, 10).await;
    let alerts = AlertService::new(pool.clone());

    let unread = alerts.list_unread_alerts(org, ListQuery::default()).await.unwrap();
    assert_eq!(unread.len(), 2);

    alerts.mark_alert_read(org, unread[0].id).await.unwrap();
    assert_eq!(
        alerts.list_unread_alerts(org, ListQuery::default()).await.unwrap().len(),
        1
    );
    assert_eq!(alerts.list_alerts(org, ListQuery::default()).await.unwrap().len(), 2);

    assert!(matches!(
        alerts.mark_alert_read(Uuid::new_v4(), unread[1].id).await,
        Err(AppError::AlertNotFound)
    ));

    assert_eq!(alerts.mark_all_alerts_read(org).await.unwrap(), 1);
    assert!(alerts
        .list_unread_alerts(org, ListQuery::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_reconcile_follows_stored_stock_not_the_snapshot() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 20, 10).await;
    let alerts = AlertService::new(pool.clone());

    // A snapshot taken while the item was low, reconciled after it recovered
    let mut stale = item.clone();
    stale.current_stock = 2;
    assert_eq!(alerts.reconcile(&stale).await.unwrap(), AlertAction::Clear);
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());

    // And the other way round
    InventoryService::new(pool.clone())
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 18))
        .await
        .unwrap();
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 1);

    let mut stale = item.clone();
    stale.current_stock = 20;
    assert_eq!(alerts.reconcile(&stale).await.unwrap(), AlertAction::Raise);
    assert_eq!(alerts.list_item_alerts(item.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_reconcile_of_deleted_item_is_a_no_op() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 1, 10).await;
    InventoryService::new(pool.clone())
        .delete_item(&caller, item.id)
        .await
        .unwrap();

    let alerts = AlertService::new(pool.clone());
    assert_eq!(alerts.reconcile(&item).await.unwrap(), AlertAction::Clear);
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());
}
