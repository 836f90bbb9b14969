//! Dashboard read models

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{CallerIdentity, Item, StockStatus};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::AppResult;
use crate::repositories::movements::MovementEntry;
use crate::repositories::{categories, items, movements};

const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_items: i64,
    /// Sum of display-unit stock times unit cost over active items
    pub total_value: Decimal,
    pub low_stock_items: i64,
    pub out_of_stock_items: i64,
    /// Movements recorded in the last seven days
    pub recent_movements_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: Uuid,
    pub category_name: String,
    pub color: Option<String>,
    pub item_count: i64,
    pub low_stock_count: i64,
    pub total_value: Decimal,
}

/// Value of an item's stock at its unit cost. Items without a cost or with an unknown
/// unit are worth zero.
pub fn stock_value(item: &Item) -> Decimal {
    match (item.unit_cost, shared::from_base_unit(item.current_stock, &item.unit_of_measurement)) {
        (Some(cost), Ok(quantity)) => quantity.checked_mul(cost).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Total stock value of `items`, saturating at `Decimal::MAX`
pub fn total_value<'a>(items: impl IntoIterator<Item = &'a Item>) -> Decimal {
    items.into_iter().fold(Decimal::ZERO, |total, item| {
        total.checked_add(stock_value(item)).unwrap_or(Decimal::MAX)
    })
}

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: SqlitePool,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get_metrics(&self, caller: &CallerIdentity) -> AppResult<DashboardMetrics> {
        let active = items::list_active(&self.db, caller.organization_id).await?;

        let mut metrics = DashboardMetrics {
            total_items: active.len() as i64,
            total_value: total_value(&active),
            low_stock_items: 0,
            out_of_stock_items: 0,
            recent_movements_count: 0,
        };
        for item in &active {
            match item.stock_status() {
                StockStatus::LowStock => metrics.low_stock_items += 1,
                StockStatus::OutOfStock => metrics.out_of_stock_items += 1,
                StockStatus::InStock | StockStatus::Untracked => {}
            }
        }

        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        metrics.recent_movements_count =
            movements::count_since(&self.db, caller.organization_id, since).await?;

        Ok(metrics)
    }

    pub async fn get_low_stock_items(&self, caller: &CallerIdentity, limit: i64) -> AppResult<Vec<Item>> {
        items::list_low_stock(&self.db, caller.organization_id, limit).await
    }

    pub async fn get_recent_movements(
        &self,
        caller: &CallerIdentity,
        limit: i64,
    ) -> AppResult<Vec<MovementEntry>> {
        movements::list_by_organization(&self.db, caller.organization_id, limit, 0).await
    }

    /// Per-category totals over active items, most valuable first
    pub async fn get_category_breakdown(
        &self,
        caller: &CallerIdentity,
    ) -> AppResult<Vec<CategoryBreakdown>> {
        let categories = categories::list(&self.db, caller.organization_id).await?;
        let active = items::list_active(&self.db, caller.organization_id).await?;

        let mut by_category: HashMap<Uuid, Vec<&Item>> = HashMap::new();
        for item in &active {
            by_category.entry(item.category_id).or_default().push(item);
        }

        let mut breakdown: Vec<CategoryBreakdown> = categories
            .into_iter()
            .map(|category| {
                let members = by_category.remove(&category.id).unwrap_or_default();
                CategoryBreakdown {
                    category_id: category.id,
                    category_name: category.name,
                    color: category.color,
                    item_count: members.len() as i64,
                    low_stock_count: members
                        .iter()
                        .filter(|item| item.stock_status() == StockStatus::LowStock)
                        .count() as i64,
                    total_value: total_value(members.iter().copied()),
                }
            })
            .collect();

        breakdown.sort_by(|a, b| {
            b.total_value
                .cmp(&a.total_value)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });

        Ok(breakdown)
    }
}
