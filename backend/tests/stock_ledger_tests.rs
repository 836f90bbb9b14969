//! Stock ledger tests
//!
//! Tests for the stock adjustment transaction including:
//! - Movement arithmetic for IN, OUT and ADJUSTMENT
//! - Rejected movements leave no trace
//! - Alert derivation after each movement
//! - Organization scoping

mod common;

use proptest::prelude::*;
use shared::{AlertType, MovementType};
use uuid::Uuid;

use stock_ledger::services::inventory::{compute_new_stock, AdjustStock};
use stock_ledger::services::{AlertService, InventoryService};
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

// ============================================================================
// Movement arithmetic
// ============================================================================

#[tokio::test]
async fn test_in_then_out_records_chain_and_raises_one_alert() {
    let pool = common::memory_pool().await;
    let org = Uuid::new_v4();
    let caller = common::admin(org);
    let item = common::create_item(&pool, &caller, 100, 10).await;

    let inventory = InventoryService::new(pool.clone());
    let alerts = AlertService::new(pool.clone());

    let movement = inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::In, 5))
        .await
        .unwrap();
    assert_eq!(movement.previous_stock, 100);
    assert_eq!(movement.new_stock, 105);
    assert_eq!(movement.created_by, caller.user_id);
    assert!(alerts.list_item_alerts(item.id).await.unwrap().is_empty());

    let movement = inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 100))
        .await
        .unwrap();
    assert_eq!(movement.previous_stock, 105);
    assert_eq!(movement.new_stock, 5);

    let item_alerts = alerts.list_item_alerts(item.id).await.unwrap();
    assert_eq!(item_alerts.len(), 1);
    assert_eq!(item_alerts[0].alert_type, AlertType::LowStock);
    assert!(!item_alerts[0].is_read);

    let history = inventory.movement_history(&caller, item.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|m| m.is_consistent()));
    assert_eq!(history[0].new_stock, history[1].previous_stock);

    let stored = inventory.get_item(&caller, item.id).await.unwrap();
    assert_eq!(stored.current_stock, 5);
}

#[tokio::test]
async fn test_out_beyond_stock_leaves_no_trace() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 100, 0).await;
    let inventory = InventoryService::new(pool.clone());

    let result = inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 150))
        .await;
    assert!(matches!(
        result,
        Err(AppError::InsufficientStock {
            available: 100,
            requested: 150
        })
    ));

    let stored = inventory.get_item(&caller, item.id).await.unwrap();
    assert_eq!(stored.current_stock, 100);
    assert!(inventory
        .movement_history(&caller, item.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_adjustment_sets_exact_value() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 100, 0).await;
    let inventory = InventoryService::new(pool.clone());

    let movement = inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Adjustment, 50))
        .await
        .unwrap();
    assert_eq!(movement.previous_stock, 100);
    assert_eq!(movement.new_stock, 50);
    assert_eq!(inventory.get_item(&caller, item.id).await.unwrap().current_stock, 50);

    let movement = inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Adjustment, 0))
        .await
        .unwrap();
    assert_eq!(movement.new_stock, 0);
    assert_eq!(inventory.get_item(&caller, item.id).await.unwrap().current_stock, 0);
}

#[tokio::test]
async fn test_zero_and_negative_quantities_are_rejected() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 10, 0).await;
    let inventory = InventoryService::new(pool.clone());

    for (movement_type, quantity) in [
        (MovementType::In, 0),
        (MovementType::Out, 0),
        (MovementType::In, -1),
        (MovementType::Adjustment, -5),
    ] {
        let result = inventory
            .adjust_stock(&caller, adjustment(item.id, movement_type, quantity))
            .await;
        assert!(
            matches!(result, Err(AppError::InvalidQuantity(_))),
            "{:?} {} should be rejected",
            movement_type,
            quantity
        );
    }

    assert!(inventory
        .movement_history(&caller, item.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_untracked_item_cannot_go_negative_and_raises_no_alerts() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let category = common::create_category(&pool, &caller, "Misc").await;
    let inventory = InventoryService::new(pool.clone());

    let mut input = common::new_item(category.id, "pcs", 3, 10);
    input.track_stock = false;
    let item = inventory.create_item(&caller, input).await.unwrap();

    inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 2))
        .await
        .unwrap();
    assert!(AlertService::new(pool.clone())
        .list_item_alerts(item.id)
        .await
        .unwrap()
        .is_empty());

    let result = inventory
        .adjust_stock(&caller, adjustment(item.id, MovementType::Out, 2))
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock { .. })));
}

#[tokio::test]
async fn test_any_role_may_move_stock() {
    let pool = common::memory_pool().await;
    let org = Uuid::new_v4();
    let item = common::create_item(&pool, &common::admin(org), 1, 0).await;

    let movement = InventoryService::new(pool.clone())
        .adjust_stock(&common::user(org), adjustment(item.id, MovementType::In, 4))
        .await
        .unwrap();
    assert_eq!(movement.new_stock, 5);
}

// ============================================================================
// Scoping
// ============================================================================

#[tokio::test]
async fn test_other_organization_sees_not_found() {
    let pool = common::memory_pool().await;
    let owner = common::admin(Uuid::new_v4());
    let stranger = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &owner, 10, 0).await;
    let inventory = InventoryService::new(pool.clone());

    assert!(matches!(
        inventory.get_item(&stranger, item.id).await,
        Err(AppError::ItemNotFound)
    ));
    assert!(matches!(
        inventory
            .adjust_stock(&stranger, adjustment(item.id, MovementType::In, 1))
            .await,
        Err(AppError::ItemNotFound)
    ));

    let movement = inventory
        .adjust_stock(&owner, adjustment(item.id, MovementType::In, 1))
        .await
        .unwrap();
    assert!(matches!(
        inventory.get_movement(&stranger, movement.id).await,
        Err(AppError::MovementNotFound)
    ));
    let found = inventory.get_movement(&owner, movement.id).await.unwrap();
    assert_eq!(found.movement.id, movement.id);
    assert_eq!(found.movement.new_stock, 11);
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());

    let result = InventoryService::new(pool)
        .adjust_stock(&caller, adjustment(Uuid::new_v4(), MovementType::In, 1))
        .await;
    assert!(matches!(result, Err(AppError::ItemNotFound)));
}

#[tokio::test]
async fn test_movement_listings_are_newest_first() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let item = common::create_item(&pool, &caller, 0, 0).await;
    let inventory = InventoryService::new(pool.clone());

    for quantity in 1..=3 {
        inventory
            .adjust_stock(&caller, adjustment(item.id, MovementType::In, quantity))
            .await
            .unwrap();
    }

    let entries = inventory
        .list_item_movements(&caller, item.id, Default::default())
        .await
        .unwrap();
    let quantities: Vec<i64> = entries.iter().map(|e| e.movement.quantity).collect();
    assert_eq!(quantities, vec![3, 2, 1]);
    assert_eq!(entries[0].item_name, item.name);
    assert_eq!(entries[0].unit, "pcs");

    let all = inventory
        .list_movements(&caller, shared::ListQuery::new(2, 0))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].movement.new_stock, 6);
}

#[tokio::test]
async fn test_record_movement_converts_display_quantity() {
    let pool = common::memory_pool().await;
    let caller = common::admin(Uuid::new_v4());
    let category = common::create_category(&pool, &caller, "Dry goods").await;
    let inventory = InventoryService::new(pool.clone());
    let item = inventory
        .create_item(&caller, common::new_item(category.id, "kg", 2000, 0))
        .await
        .unwrap();

    let request: shared::CreateMovementRequest = serde_json::from_value(serde_json::json!({
        "itemId": item.id,
        "movementType": "OUT",
        "quantity": "0.75"
    }))
    .unwrap();

    let (movement, _) = inventory.record_movement(&caller, request).await.unwrap();
    assert_eq!(movement.quantity, 750);
    assert_eq!(movement.new_stock, 1250);

    let display = movement.to_display("kg").unwrap();
    assert_eq!(display.new_stock, rust_decimal::Decimal::new(125, 2));
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Any accepted movement satisfies the ledger invariant
    #[test]
    fn prop_accepted_movements_are_consistent(
        previous in 0i64..1_000_000,
        quantity in 0i64..1_000_000,
        kind in prop::sample::select(vec![MovementType::In, MovementType::Out, MovementType::Adjustment]),
    ) {
        if let Ok(new_stock) = compute_new_stock(kind, previous, quantity) {
            prop_assert!(new_stock >= 0);
            let movement = shared::StockMovement {
                id: Uuid::new_v4(),
                item_id: Uuid::new_v4(),
                movement_type: kind,
                quantity,
                previous_stock: previous,
                new_stock,
                reference: None,
                notes: None,
                created_by: Uuid::new_v4(),
                created_at: chrono::Utc::now(),
            };
            prop_assert!(movement.is_consistent());
        } else {
            prop_assert_eq!(kind, MovementType::Out);
            prop_assert!(quantity > previous);
        }
    }
}
