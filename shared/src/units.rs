//! Unit conversion between display units and integer base units
//!
//! Stock is stored as an integer count of base units (grams, milliliters, pieces) so that
//! repeated movements never accumulate rounding drift. Callers enter and read quantities in
//! display units (kilograms, liters, ...) and this module converts at the edge.
//!
//! Rounding is half away from zero everywhere: `0.0015 kg` is `2 g`, `0.0014 kg` is `1 g`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

/// Errors produced by the conversion engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("invalid unit: {0}")]
    InvalidUnit(String),

    #[error("negative value not allowed")]
    NegativeValue,

    #[error("cannot convert {from} to {to}: units measure different quantities")]
    IncompatibleUnits { from: String, to: String },

    #[error("value out of range for unit {0}")]
    ValueOutOfRange(String),

    #[error("{unit} quantities allow at most {precision} decimal places")]
    PrecisionExceeded { unit: String, precision: u32 },
}

/// A measurement unit and how it decomposes into its base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub code: &'static str,
    pub name: &'static str,
    pub base_unit: &'static str,
    /// Number of base units in one display unit
    pub factor: i64,
    /// Decimal places shown for display values
    pub precision: u32,
    pub allows_fraction: bool,
}

impl Unit {
    /// Whether `value` can be expressed exactly at this unit's display precision
    pub fn is_representable(&self, value: Decimal) -> bool {
        value >= Decimal::ZERO && value.round_dp(self.precision) == value
    }
}

const BUILTIN_UNITS: [Unit; 4] = [
    Unit {
        code: "kg",
        name: "Kilogram",
        base_unit: "g",
        factor: 1000,
        precision: 3,
        allows_fraction: true,
    },
    Unit {
        code: "gm",
        name: "Gram",
        base_unit: "g",
        factor: 1,
        precision: 0,
        allows_fraction: false,
    },
    Unit {
        code: "ltr",
        name: "Liter",
        base_unit: "ml",
        factor: 1000,
        precision: 3,
        allows_fraction: true,
    },
    Unit {
        code: "pcs",
        name: "Pieces",
        base_unit: "pcs",
        factor: 1,
        precision: 0,
        allows_fraction: false,
    },
];

static UNITS: Lazy<HashMap<&'static str, Unit>> =
    Lazy::new(|| BUILTIN_UNITS.iter().map(|u| (u.code, *u)).collect());

/// Look up a unit by its code
pub fn lookup_unit(code: &str) -> Result<&'static Unit, UnitError> {
    UNITS
        .get(code)
        .ok_or_else(|| UnitError::InvalidUnit(code.to_string()))
}

/// Check that a unit code is supported
pub fn validate_unit(code: &str) -> Result<(), UnitError> {
    lookup_unit(code).map(|_| ())
}

/// All supported units, in a stable order
pub fn supported_units() -> &'static [Unit] {
    &BUILTIN_UNITS
}

/// Convert a display value to an integer amount of base units
///
/// `1.5 kg` becomes `1500` (grams).
pub fn to_base_unit(value: Decimal, code: &str) -> Result<i64, UnitError> {
    let unit = lookup_unit(code)?;
    if value < Decimal::ZERO {
        return Err(UnitError::NegativeValue);
    }

    value
        .checked_mul(Decimal::from(unit.factor))
        .map(|base| base.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|base| base.to_i64())
        .ok_or_else(|| UnitError::ValueOutOfRange(code.to_string()))
}

/// Convert an integer amount of base units to a display value
///
/// `1500` (grams) becomes `1.5 kg`. The result is rounded to the unit's precision.
pub fn from_base_unit(base_value: i64, code: &str) -> Result<Decimal, UnitError> {
    let unit = lookup_unit(code)?;
    if base_value < 0 {
        return Err(UnitError::NegativeValue);
    }

    let display = Decimal::from(base_value) / Decimal::from(unit.factor);
    Ok(display
        .round_dp_with_strategy(unit.precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize())
}

/// Convert a display value from one unit to another of the same base family
///
/// Converting between families (mass to volume) is refused rather than producing a number
/// scaled by unrelated factors.
pub fn convert_between_units(value: Decimal, from: &str, to: &str) -> Result<Decimal, UnitError> {
    let from_unit = lookup_unit(from)?;
    let to_unit = lookup_unit(to)?;
    if from_unit.base_unit != to_unit.base_unit {
        return Err(UnitError::IncompatibleUnits {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    let base = to_base_unit(value, from)?;
    from_base_unit(base, to)
}
