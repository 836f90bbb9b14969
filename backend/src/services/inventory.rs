//! Inventory service: items and the stock adjustment transaction
//!
//! Every stock change goes through [`InventoryService::adjust_stock`], which updates the
//! item and appends the movement in one database transaction. Alerts are reconciled after
//! commit and never roll a committed change back.

use chrono::Utc;
use shared::{
    CallerIdentity, CreateMovementRequest, Item, ItemChanges, ItemFilter, ListQuery,
    MovementType, NewItem, StockMovement,
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::time::Duration;
use uuid::Uuid;

use super::{require_admin, AlertService};
use crate::error::{AppError, AppResult};
use crate::repositories::movements::MovementEntry;
use crate::repositories::{categories, items, movements};

const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Input for a stock adjustment, quantity in base units
#[derive(Debug, Clone)]
pub struct AdjustStock {
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Check a base-unit quantity for a movement type. ADJUSTMENT may be zero; IN and OUT may not.
pub fn validate_quantity(movement_type: MovementType, quantity: i64) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::InvalidQuantity(
            "Quantity cannot be negative".to_string(),
        ));
    }
    if quantity == 0 && movement_type != MovementType::Adjustment {
        return Err(AppError::InvalidQuantity(format!(
            "{} quantity must be greater than zero",
            movement_type.as_str()
        )));
    }
    Ok(())
}

/// Stock level after applying a movement to `previous`
pub fn compute_new_stock(
    movement_type: MovementType,
    previous: i64,
    quantity: i64,
) -> AppResult<i64> {
    match movement_type {
        MovementType::In => previous
            .checked_add(quantity)
            .ok_or_else(|| AppError::InvalidQuantity("Stock level would overflow".to_string())),
        MovementType::Out => {
            let new_stock = previous
                .checked_sub(quantity)
                .ok_or_else(|| AppError::InvalidQuantity("Stock level would overflow".to_string()))?;
            if new_stock < 0 {
                return Err(AppError::InsufficientStock {
                    available: previous,
                    requested: quantity,
                });
            }
            Ok(new_stock)
        }
        MovementType::Adjustment => Ok(quantity),
    }
}

/// Older ADJUSTMENT semantics that added the quantity to the current stock instead of
/// setting it. Not used by the ledger; kept so historic movements can be re-derived.
pub fn legacy_additive_stock(previous: i64, quantity: i64) -> Option<i64> {
    previous.checked_add(quantity)
}

/// Inventory service
#[derive(Clone)]
pub struct InventoryService {
    db: SqlitePool,
    alerts: AlertService,
    transaction_timeout: Duration,
}

impl InventoryService {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            alerts: AlertService::new(db.clone()),
            db,
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    // ========================================================================
    // Stock adjustment
    // ========================================================================

    /// Apply a stock movement and return the recorded movement
    pub async fn adjust_stock(
        &self,
        caller: &CallerIdentity,
        input: AdjustStock,
    ) -> AppResult<StockMovement> {
        validate_quantity(input.movement_type, input.quantity)?;

        // The deadline covers locking and writing. Once the commit starts the outcome is
        // whatever the commit reports.
        let (tx, movement, item) = tokio::time::timeout(
            self.transaction_timeout,
            self.apply_adjustment(caller, &input),
        )
        .await
        .map_err(|_| {
            tracing::warn!(item_id = %input.item_id, "Stock adjustment timed out");
            AppError::Timeout
        })??;
        tx.commit().await?;

        tracing::info!(
            item_id = %movement.item_id,
            movement_id = %movement.id,
            movement_type = movement.movement_type.as_str(),
            quantity = movement.quantity,
            previous_stock = movement.previous_stock,
            new_stock = movement.new_stock,
            "Stock movement recorded"
        );

        self.alerts.reconcile_after_commit(&item).await;

        Ok(movement)
    }

    /// Lock the item and write the new stock and movement, leaving the transaction open for
    /// the caller to commit. Dropping the future or the returned transaction rolls back.
    async fn apply_adjustment(
        &self,
        caller: &CallerIdentity,
        input: &AdjustStock,
    ) -> AppResult<(Transaction<'static, Sqlite>, StockMovement, Item)> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let mut item = items::lock_for_update(&mut *tx, caller.organization_id, input.item_id, now)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        let previous_stock = item.current_stock;
        let new_stock = compute_new_stock(input.movement_type, previous_stock, input.quantity)?;

        items::set_stock(&mut *tx, item.id, new_stock, now).await?;

        let movement = StockMovement {
            id: Uuid::new_v4(),
            item_id: item.id,
            movement_type: input.movement_type,
            quantity: input.quantity,
            previous_stock,
            new_stock,
            reference: input.reference.clone(),
            notes: input.notes.clone(),
            created_by: caller.user_id,
            created_at: now,
        };
        movements::insert(&mut *tx, &movement).await?;

        item.current_stock = new_stock;
        item.updated_at = now;
        Ok((tx, movement, item))
    }

    /// Record a movement given in the item's display unit
    pub async fn record_movement(
        &self,
        caller: &CallerIdentity,
        request: CreateMovementRequest,
    ) -> AppResult<(StockMovement, Item)> {
        let item = self.get_item(caller, request.item_id).await?;
        let quantity = request.base_quantity(&item.unit_of_measurement)?;

        let movement = self
            .adjust_stock(
                caller,
                AdjustStock {
                    item_id: item.id,
                    movement_type: request.movement_type,
                    quantity,
                    reference: request.reference,
                    notes: request.notes,
                },
            )
            .await?;

        Ok((movement, item))
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub async fn create_item(&self, caller: &CallerIdentity, input: NewItem) -> AppResult<Item> {
        require_admin(caller)?;
        shared::validate_item_name(&input.name)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        shared::validate_unit(&input.unit_of_measurement)?;
        if let Some(sku) = &input.sku {
            shared::validate_sku(sku).map_err(|e| AppError::ValidationError(e.to_string()))?;
        }
        if input.minimum_threshold < 0 || input.current_stock < 0 {
            return Err(AppError::NegativeValue);
        }

        categories::find(&self.db, caller.organization_id, input.category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            organization_id: caller.organization_id,
            category_id: input.category_id,
            name: input.name.trim().to_string(),
            sku: input.sku,
            unit_of_measurement: input.unit_of_measurement,
            minimum_threshold: input.minimum_threshold,
            current_stock: input.current_stock,
            unit_cost: input.unit_cost,
            is_active: true,
            track_stock: input.track_stock,
            created_at: now,
            updated_at: now,
        };
        items::insert(&self.db, &item).await?;

        tracing::info!(item_id = %item.id, name = %item.name, "Item created");

        self.alerts.reconcile_after_commit(&item).await;

        Ok(item)
    }

    pub async fn get_item(&self, caller: &CallerIdentity, item_id: Uuid) -> AppResult<Item> {
        items::find(&self.db, caller.organization_id, item_id)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn list_items(
        &self,
        caller: &CallerIdentity,
        filter: &ItemFilter,
        query: ListQuery,
    ) -> AppResult<Vec<Item>> {
        items::list(
            &self.db,
            caller.organization_id,
            filter,
            query.limit_or(50),
            query.offset(),
        )
        .await
    }

    pub async fn count_items(&self, caller: &CallerIdentity, filter: &ItemFilter) -> AppResult<i64> {
        items::count(&self.db, caller.organization_id, filter).await
    }

    /// Edit item fields. Stock is only changed through movements.
    pub async fn update_item(
        &self,
        caller: &CallerIdentity,
        item_id: Uuid,
        changes: ItemChanges,
    ) -> AppResult<Item> {
        require_admin(caller)?;
        let mut item = self.get_item(caller, item_id).await?;
        let previous_threshold = item.minimum_threshold;
        let previous_tracking = item.track_stock;

        if let Some(category_id) = changes.category_id {
            if category_id != item.category_id {
                categories::find(&self.db, caller.organization_id, category_id)
                    .await?
                    .ok_or(AppError::CategoryNotFound)?;
                item.category_id = category_id;
            }
        }
        if let Some(name) = changes.name {
            shared::validate_item_name(&name)
                .map_err(|e| AppError::ValidationError(e.to_string()))?;
            item.name = name.trim().to_string();
        }
        if let Some(sku) = changes.sku {
            let sku = sku.trim().to_string();
            if sku.is_empty() {
                item.sku = None;
            } else {
                shared::validate_sku(&sku).map_err(|e| AppError::ValidationError(e.to_string()))?;
                item.sku = Some(sku);
            }
        }
        if let Some(unit) = changes.unit_of_measurement {
            let new_unit = shared::lookup_unit(&unit)?;
            let old_unit = shared::lookup_unit(&item.unit_of_measurement)?;
            // Stored stock is in base units; only a unit of the same base keeps it meaningful.
            if new_unit.base_unit != old_unit.base_unit {
                return Err(AppError::IncompatibleUnits {
                    from: item.unit_of_measurement.clone(),
                    to: unit,
                });
            }
            item.unit_of_measurement = unit;
        }
        if let Some(threshold) = changes.minimum_threshold {
            if threshold < 0 {
                return Err(AppError::NegativeValue);
            }
            item.minimum_threshold = threshold;
        }
        if let Some(unit_cost) = changes.unit_cost {
            item.unit_cost = Some(unit_cost);
        }
        if let Some(track_stock) = changes.track_stock {
            item.track_stock = track_stock;
        }
        if let Some(is_active) = changes.is_active {
            item.is_active = is_active;
        }
        item.updated_at = Utc::now();

        items::update(&self.db, &item).await?;

        tracing::info!(item_id = %item.id, "Item updated");

        if item.minimum_threshold != previous_threshold || item.track_stock != previous_tracking {
            self.alerts.reconcile_after_commit(&item).await;
        }

        Ok(item)
    }

    /// Delete an item with its alerts; movements follow by cascade
    pub async fn delete_item(&self, caller: &CallerIdentity, item_id: Uuid) -> AppResult<()> {
        require_admin(caller)?;

        let mut tx = self.db.begin().await?;

        // Write first so the transaction holds the write lock from its first statement
        items::lock_for_update(&mut *tx, caller.organization_id, item_id, Utc::now())
            .await?
            .ok_or(AppError::ItemNotFound)?;
        crate::repositories::alerts::delete_for_item(&mut *tx, item_id).await?;
        items::delete(&mut *tx, caller.organization_id, item_id).await?;

        tx.commit().await?;

        tracing::info!(item_id = %item_id, "Item deleted");
        Ok(())
    }

    // ========================================================================
    // Movements
    // ========================================================================

    pub async fn get_movement(
        &self,
        caller: &CallerIdentity,
        movement_id: Uuid,
    ) -> AppResult<MovementEntry> {
        movements::find(&self.db, caller.organization_id, movement_id)
            .await?
            .ok_or(AppError::MovementNotFound)
    }

    pub async fn list_item_movements(
        &self,
        caller: &CallerIdentity,
        item_id: Uuid,
        query: ListQuery,
    ) -> AppResult<Vec<MovementEntry>> {
        self.get_item(caller, item_id).await?;
        movements::list_by_item(
            &self.db,
            caller.organization_id,
            item_id,
            query.limit_or(50),
            query.offset(),
        )
        .await
    }

    pub async fn list_movements(
        &self,
        caller: &CallerIdentity,
        query: ListQuery,
    ) -> AppResult<Vec<MovementEntry>> {
        movements::list_by_organization(
            &self.db,
            caller.organization_id,
            query.limit_or(50),
            query.offset(),
        )
        .await
    }

    /// Full movement chain of an item in commit order
    pub async fn movement_history(
        &self,
        caller: &CallerIdentity,
        item_id: Uuid,
    ) -> AppResult<Vec<StockMovement>> {
        self.get_item(caller, item_id).await?;
        movements::history(&self.db, item_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(MovementType::In, 1).is_ok());
        assert!(validate_quantity(MovementType::Adjustment, 0).is_ok());
        assert!(matches!(
            validate_quantity(MovementType::In, 0),
            Err(AppError::InvalidQuantity(_))
        ));
        assert!(matches!(
            validate_quantity(MovementType::Out, 0),
            Err(AppError::InvalidQuantity(_))
        ));
        assert!(matches!(
            validate_quantity(MovementType::Adjustment, -1),
            Err(AppError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_compute_new_stock() {
        assert_eq!(compute_new_stock(MovementType::In, 100, 5).unwrap(), 105);
        assert_eq!(compute_new_stock(MovementType::Out, 105, 100).unwrap(), 5);
        assert_eq!(compute_new_stock(MovementType::Out, 5, 5).unwrap(), 0);
        assert_eq!(compute_new_stock(MovementType::Adjustment, 100, 50).unwrap(), 50);
        assert_eq!(compute_new_stock(MovementType::Adjustment, 100, 0).unwrap(), 0);
    }

    #[test]
    fn test_out_beyond_stock_is_rejected() {
        match compute_new_stock(MovementType::Out, 5, 10) {
            Err(AppError::InsufficientStock {
                available,
                requested,
            }) => {
                assert_eq!(available, 5);
                assert_eq!(requested, 10);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_overflow_is_invalid_quantity() {
        assert!(matches!(
            compute_new_stock(MovementType::In, i64::MAX, 1),
            Err(AppError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_legacy_additive_adjustment() {
        assert_eq!(legacy_additive_stock(100, 50), Some(150));
        assert_eq!(legacy_additive_stock(0, 0), Some(0));
        assert_eq!(legacy_additive_stock(i64::MAX, 1), None);
        // The ledger itself sets the value instead.
        assert_eq!(compute_new_stock(MovementType::Adjustment, 100, 50).unwrap(), 50);
    }
}
