//! Stocked items
//!
//! Stock and threshold values are integers in the item's base unit. The `*Request` types
//! carry display-unit decimals as entered by users and convert on the way in; `ItemDisplay`
//! converts on the way out.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::units::{from_base_unit, UnitError};
use crate::validation::base_quantity;

/// An item whose stock is tracked by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    #[serde(rename = "unit")]
    pub unit_of_measurement: String,
    pub minimum_threshold: i64,
    pub current_stock: i64,
    pub unit_cost: Option<Decimal>,
    pub is_active: bool,
    pub track_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock level classification shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
    Untracked,
}

impl StockStatus {
    pub fn classify(track_stock: bool, current_stock: i64, minimum_threshold: i64) -> Self {
        if !track_stock {
            StockStatus::Untracked
        } else if current_stock == 0 {
            StockStatus::OutOfStock
        } else if current_stock < minimum_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "IN_STOCK",
            StockStatus::LowStock => "LOW_STOCK",
            StockStatus::OutOfStock => "OUT_OF_STOCK",
            StockStatus::Untracked => "UNTRACKED",
        }
    }
}

impl Item {
    /// Below threshold and tracked
    pub fn is_low_stock(&self) -> bool {
        self.track_stock && self.current_stock < self.minimum_threshold
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.track_stock, self.current_stock, self.minimum_threshold)
    }

    /// Convert stock values to the item's display unit
    pub fn to_display(&self) -> Result<ItemDisplay, UnitError> {
        Ok(ItemDisplay {
            id: self.id,
            organization_id: self.organization_id,
            category_id: self.category_id,
            name: self.name.clone(),
            sku: self.sku.clone(),
            unit_of_measurement: self.unit_of_measurement.clone(),
            minimum_threshold: from_base_unit(self.minimum_threshold, &self.unit_of_measurement)?,
            current_stock: from_base_unit(self.current_stock, &self.unit_of_measurement)?,
            unit_cost: self.unit_cost,
            is_active: self.is_active,
            track_stock: self.track_stock,
            stock_status: self.stock_status(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// An item with stock values expressed in its display unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDisplay {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    #[serde(rename = "unit")]
    pub unit_of_measurement: String,
    pub minimum_threshold: Decimal,
    pub current_stock: Decimal,
    pub unit_cost: Option<Decimal>,
    pub is_active: bool,
    pub track_stock: bool,
    pub stock_status: StockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new item with quantities already in base units
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub category_id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub unit_of_measurement: String,
    pub minimum_threshold: i64,
    pub current_stock: i64,
    pub unit_cost: Option<Decimal>,
    pub track_stock: bool,
}

/// Field edits on an existing item. Stock itself is only changed through movements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub unit_of_measurement: Option<String>,
    pub minimum_threshold: Option<i64>,
    pub unit_cost: Option<Decimal>,
    pub track_stock: Option<bool>,
    pub is_active: Option<bool>,
}

/// Item creation request in display units
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 50))]
    pub sku: Option<String>,
    #[serde(rename = "unit")]
    pub unit_of_measurement: String,
    #[serde(default)]
    pub minimum_threshold: Decimal,
    #[serde(default)]
    pub current_stock: Decimal,
    pub unit_cost: Option<Decimal>,
    pub track_stock: Option<bool>,
}

impl CreateItemRequest {
    pub fn into_new_item(self) -> Result<NewItem, UnitError> {
        let minimum_threshold = base_quantity(self.minimum_threshold, &self.unit_of_measurement)?;
        let current_stock = base_quantity(self.current_stock, &self.unit_of_measurement)?;

        Ok(NewItem {
            category_id: self.category_id,
            name: self.name,
            sku: self.sku.filter(|s| !s.trim().is_empty()),
            unit_of_measurement: self.unit_of_measurement,
            minimum_threshold,
            current_stock,
            unit_cost: self.unit_cost,
            track_stock: self.track_stock.unwrap_or(true),
        })
    }
}

/// Partial item update in display units
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub sku: Option<String>,
    #[serde(rename = "unit")]
    pub unit_of_measurement: Option<String>,
    pub minimum_threshold: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub track_stock: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateItemRequest {
    /// Convert to base units. A new threshold is read in the new unit when the unit changes,
    /// otherwise in `current_unit`.
    pub fn into_changes(self, current_unit: &str) -> Result<ItemChanges, UnitError> {
        let unit = self.unit_of_measurement.as_deref().unwrap_or(current_unit);
        let minimum_threshold = self
            .minimum_threshold
            .map(|t| base_quantity(t, unit))
            .transpose()?;

        Ok(ItemChanges {
            category_id: self.category_id,
            name: self.name,
            sku: self.sku,
            unit_of_measurement: self.unit_of_measurement,
            minimum_threshold,
            unit_cost: self.unit_cost,
            track_stock: self.track_stock,
            is_active: self.is_active,
        })
    }
}

/// Filters for listing items
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    /// Case-insensitive match on name or SKU
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub low_stock_only: bool,
}
