//! Stock movements: the immutable audit trail of every stock change

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::units::{from_base_unit, UnitError};
use crate::validation::base_quantity;

/// Kind of stock change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Adds `quantity` to the current stock
    In,
    /// Removes `quantity` from the current stock
    Out,
    /// Sets the current stock to exactly `quantity`
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "IN",
            MovementType::Out => "OUT",
            MovementType::Adjustment => "ADJUSTMENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(MovementType::In),
            "OUT" => Some(MovementType::Out),
            "ADJUSTMENT" => Some(MovementType::Adjustment),
            _ => None,
        }
    }
}

/// One recorded stock change. `previous_stock` and `new_stock` are captured inside the
/// transaction that applied the change and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Whether the recorded before/after values match the movement's effect
    pub fn is_consistent(&self) -> bool {
        match self.movement_type {
            MovementType::In => self.new_stock - self.previous_stock == self.quantity,
            MovementType::Out => self.previous_stock - self.new_stock == self.quantity,
            MovementType::Adjustment => self.new_stock == self.quantity,
        }
    }

    /// Convert quantities to the display unit of the moved item
    pub fn to_display(&self, unit: &str) -> Result<StockMovementDisplay, UnitError> {
        Ok(StockMovementDisplay {
            id: self.id,
            item_id: self.item_id,
            movement_type: self.movement_type,
            quantity: from_base_unit(self.quantity, unit)?,
            previous_stock: from_base_unit(self.previous_stock, unit)?,
            new_stock: from_base_unit(self.new_stock, unit)?,
            unit: unit.to_string(),
            reference: self.reference.clone(),
            notes: self.notes.clone(),
            created_by: self.created_by,
            created_at: self.created_at,
        })
    }
}

/// A movement with quantities in the item's display unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementDisplay {
    pub id: Uuid,
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub previous_stock: Decimal,
    pub new_stock: Decimal,
    pub unit: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request to move stock, quantity in the item's display unit
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementRequest {
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateMovementRequest {
    /// Quantity in base units of `unit`
    pub fn base_quantity(&self, unit: &str) -> Result<i64, UnitError> {
        base_quantity(self.quantity, unit)
    }
}
