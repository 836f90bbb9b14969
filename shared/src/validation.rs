//! Validation utilities for ledger input
//!
//! These complement the `validator` derives on request types with the rules derives
//! cannot express.

use crate::units::{lookup_unit, to_base_unit, UnitError};
use rust_decimal::Decimal;

/// Validate category name length (1-100 characters after trimming)
pub fn validate_category_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Category name is required");
    }
    if len > 100 {
        return Err("Category name must be at most 100 characters");
    }
    Ok(())
}

/// Validate item name length (1-255 characters after trimming)
pub fn validate_item_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Item name is required");
    }
    if len > 255 {
        return Err("Item name must be at most 255 characters");
    }
    Ok(())
}

/// Validate hex color in `#RRGGBB` form
pub fn validate_hex_color(color: &str) -> Result<(), &'static str> {
    let Some(hex) = color.strip_prefix('#') else {
        return Err("Color must start with '#'");
    };
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color must be in #RRGGBB format");
    }
    Ok(())
}

/// Validate SKU: up to 50 characters of letters, digits, '-', '_' or '.'
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU cannot be empty");
    }
    if sku.len() > 50 {
        return Err("SKU must be at most 50 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("SKU may contain only letters, digits, '-', '_' and '.'");
    }
    Ok(())
}

/// Validate a display quantity against a unit: known unit, not negative, no more decimal
/// places than the unit displays, and within range of the base unit
pub fn validate_quantity(value: Decimal, unit: &str) -> Result<(), UnitError> {
    base_quantity(value, unit).map(|_| ())
}

/// Convert a quantity typed by a user to base units, refusing values that would have to be
/// rounded (`2.5` pcs, `1.2345` kg)
pub fn base_quantity(value: Decimal, unit: &str) -> Result<i64, UnitError> {
    let spec = lookup_unit(unit)?;
    if value < Decimal::ZERO {
        return Err(UnitError::NegativeValue);
    }
    let fractional = !value.fract().is_zero();
    if !spec.is_representable(value) || (fractional && !spec.allows_fraction) {
        return Err(UnitError::PrecisionExceeded {
            unit: spec.code.to_string(),
            precision: spec.precision,
        });
    }
    to_base_unit(value, unit)
}

/// Trim optional text, mapping blank input to `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
