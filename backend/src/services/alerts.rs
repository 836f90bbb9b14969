//! Low-stock alert derivation and alert inbox

use chrono::Utc;
use shared::{Alert, Item, ListQuery, NewAlert};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repositories::{alerts, items};

/// What reconciliation does to an item's alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Append a new unread LOW_STOCK alert
    Raise,
    /// Delete every alert of the item
    Clear,
}

/// Decide the alert action for an item's observed state.
///
/// Untracked items never carry alerts. Below threshold raises; anything else clears, which
/// also covers stock recovering past the threshold.
pub fn decide(track_stock: bool, minimum_threshold: i64, current_stock: i64) -> AlertAction {
    if !track_stock {
        AlertAction::Clear
    } else if current_stock < minimum_threshold {
        AlertAction::Raise
    } else {
        AlertAction::Clear
    }
}

/// Alert service
#[derive(Clone)]
pub struct AlertService {
    db: SqlitePool,
}

impl AlertService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Bring an item's alerts in line with its stored state. `item` only names the item;
    /// its stock and threshold are re-read under the write lock, so reconciliations that
    /// finish out of order still leave alerts matching the latest committed stock.
    pub async fn reconcile(&self, item: &Item) -> AppResult<AlertAction> {
        let mut tx = self.db.begin().await?;

        let Some(current) = items::lock_current(&mut *tx, item.id).await? else {
            // Deleted meanwhile; its alerts went with it
            return Ok(AlertAction::Clear);
        };

        let action = decide(current.track_stock, current.minimum_threshold, current.current_stock);
        match action {
            AlertAction::Raise => {
                let alert =
                    alerts::insert(&mut *tx, NewAlert::low_stock(&current), Utc::now()).await?;
                tracing::info!(
                    item_id = %current.id,
                    alert_id = %alert.id,
                    current_stock = current.current_stock,
                    minimum_threshold = current.minimum_threshold,
                    "Low stock alert raised"
                );
            }
            AlertAction::Clear => {
                let cleared = alerts::delete_for_item(&mut *tx, current.id).await?;
                if cleared > 0 {
                    tracing::debug!(item_id = %current.id, cleared, "Alerts cleared");
                }
            }
        }

        tx.commit().await?;
        Ok(action)
    }

    /// Reconcile after a committed change. Failures are logged and swallowed; the change
    /// they follow is already durable.
    pub async fn reconcile_after_commit(&self, item: &Item) {
        if let Err(e) = self.reconcile(item).await {
            tracing::warn!(item_id = %item.id, error = %e, "Alert reconciliation failed");
        }
    }

    pub async fn list_alerts(&self, organization_id: Uuid, query: ListQuery) -> AppResult<Vec<Alert>> {
        alerts::list(&self.db, organization_id, false, query.limit_or(50), query.offset()).await
    }

    pub async fn list_unread_alerts(
        &self,
        organization_id: Uuid,
        query: ListQuery,
    ) -> AppResult<Vec<Alert>> {
        alerts::list(&self.db, organization_id, true, query.limit_or(50), query.offset()).await
    }

    pub async fn list_item_alerts(&self, item_id: Uuid) -> AppResult<Vec<Alert>> {
        alerts::list_for_item(&self.db, item_id).await
    }

    pub async fn mark_alert_read(&self, organization_id: Uuid, alert_id: Uuid) -> AppResult<()> {
        let updated = alerts::mark_read(&self.db, organization_id, alert_id).await?;
        if updated == 0 {
            return Err(AppError::AlertNotFound);
        }
        Ok(())
    }

    /// Returns the number of alerts that were unread
    pub async fn mark_all_alerts_read(&self, organization_id: Uuid) -> AppResult<u64> {
        alerts::mark_all_read(&self.db, organization_id).await
    }
}
