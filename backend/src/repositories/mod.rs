//! SQLite persistence
//!
//! Every function takes an executor so the same query runs against the pool or inside a
//! transaction (`&mut *tx`). Row structs mirror the table layout and convert into the
//! shared domain models.

pub mod alerts;
pub mod categories;
pub mod items;
pub mod movements;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::AppError;

fn parse_decimal(column: &str, raw: Option<String>) -> Result<Option<Decimal>, AppError> {
    raw.map(|s| {
        Decimal::from_str(&s)
            .map_err(|e| AppError::Internal(format!("Corrupt decimal in {}: {}", column, e)))
    })
    .transpose()
}

fn corrupt(column: &str, value: &str) -> AppError {
    AppError::Internal(format!("Unexpected value in {}: {}", column, value))
}
