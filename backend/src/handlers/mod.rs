//! HTTP handlers

pub mod alerts;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod items;
pub mod movements;
pub mod units;

use serde::Serialize;
use shared::StockMovementDisplay;

use crate::error::AppError;
use crate::repositories::movements::MovementEntry;

/// A movement in its item's display unit, labelled with the item name
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementView {
    #[serde(flatten)]
    pub movement: StockMovementDisplay,
    pub item_name: String,
}

impl TryFrom<MovementEntry> for MovementView {
    type Error = AppError;

    fn try_from(entry: MovementEntry) -> Result<Self, Self::Error> {
        Ok(MovementView {
            movement: entry.movement.to_display(&entry.unit)?,
            item_name: entry.item_name,
        })
    }
}
