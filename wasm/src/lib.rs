//! WebAssembly module for the Stock Ledger client
//!
//! Exposes the unit conversion engine so the browser converts and validates quantities
//! exactly the way the server does. Decimal values cross the boundary as strings.

use rust_decimal::Decimal;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

use shared::{StockStatus, UnitError};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("stock-ledger wasm ready"));
}

fn parse_decimal(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim()).map_err(|_| format!("Invalid number: {}", value))
}

fn unit_error(err: UnitError) -> String {
    err.to_string()
}

fn base_quantity(value: &str, unit: &str) -> Result<i64, String> {
    shared::to_base_unit(parse_decimal(value)?, unit).map_err(unit_error)
}

fn display_quantity(base_value: i64, unit: &str) -> Result<String, String> {
    shared::from_base_unit(base_value, unit)
        .map(|d| d.to_string())
        .map_err(unit_error)
}

fn converted_quantity(value: &str, from: &str, to: &str) -> Result<String, String> {
    shared::convert_between_units(parse_decimal(value)?, from, to)
        .map(|d| d.to_string())
        .map_err(unit_error)
}

fn quantity_is_valid(value: &str, unit: &str) -> bool {
    parse_decimal(value)
        .map(|d| shared::validate_quantity(d, unit).is_ok())
        .unwrap_or(false)
}

fn classify_stock(track_stock: bool, current_stock: i64, minimum_threshold: i64) -> StockStatus {
    StockStatus::classify(track_stock, current_stock, minimum_threshold)
}

/// Convert a display quantity (e.g. `"1.5"` kg) to integer base units
#[wasm_bindgen]
pub fn to_base_unit(value: &str, unit: &str) -> Result<i64, JsValue> {
    base_quantity(value, unit).map_err(|e| JsValue::from_str(&e))
}

/// Convert integer base units to a display quantity string
#[wasm_bindgen]
pub fn from_base_unit(base_value: i64, unit: &str) -> Result<String, JsValue> {
    display_quantity(base_value, unit).map_err(|e| JsValue::from_str(&e))
}

/// Convert a display quantity between two units of the same base
#[wasm_bindgen]
pub fn convert(value: &str, from: &str, to: &str) -> Result<String, JsValue> {
    converted_quantity(value, from, to).map_err(|e| JsValue::from_str(&e))
}

/// Whether a quantity typed by the user is acceptable for the unit
#[wasm_bindgen]
pub fn is_valid_quantity(value: &str, unit: &str) -> bool {
    quantity_is_valid(value, unit)
}

/// Stock status label (`IN_STOCK`, `LOW_STOCK`, `OUT_OF_STOCK`, `UNTRACKED`)
#[wasm_bindgen]
pub fn stock_status(track_stock: bool, current_stock: i64, minimum_threshold: i64) -> String {
    classify_stock(track_stock, current_stock, minimum_threshold)
        .as_str()
        .to_string()
}

/// Codes of the supported units, in table order
#[wasm_bindgen]
pub fn supported_unit_codes() -> js_sys::Array {
    shared::supported_units()
        .iter()
        .map(|u| JsValue::from_str(u.code))
        .collect()
}

/// Full unit table as JSON
#[wasm_bindgen]
pub fn supported_units_json() -> Result<String, JsValue> {
    serde_json::to_string(shared::supported_units())
        .map_err(|e| JsValue::from_str(&format!("Failed to encode units: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_quantity() {
        assert_eq!(base_quantity("1.5", "kg"), Ok(1500));
        assert_eq!(base_quantity(" 250 ", "gm"), Ok(250));
        assert_eq!(base_quantity("0.0005", "kg"), Ok(1));
        assert!(base_quantity("-1", "kg").is_err());
        assert!(base_quantity("abc", "kg").is_err());
        assert!(base_quantity("1", "bushel").is_err());
    }

    #[test]
    fn test_display_quantity() {
        assert_eq!(display_quantity(1500, "kg"), Ok("1.5".to_string()));
        assert_eq!(display_quantity(2000, "ltr"), Ok("2".to_string()));
        assert_eq!(display_quantity(7, "pcs"), Ok("7".to_string()));
        assert!(display_quantity(-1, "pcs").is_err());
    }

    #[test]
    fn test_converted_quantity() {
        assert_eq!(converted_quantity("2", "kg", "gm"), Ok("2000".to_string()));
        assert!(converted_quantity("2", "kg", "ltr").is_err());
    }

    #[test]
    fn test_quantity_is_valid() {
        assert!(quantity_is_valid("1.25", "kg"));
        assert!(quantity_is_valid("0", "pcs"));
        assert!(!quantity_is_valid("-3", "pcs"));
        assert!(!quantity_is_valid("2.5", "pcs"));
        assert!(!quantity_is_valid("1.2345", "kg"));
        assert!(!quantity_is_valid("", "kg"));
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(stock_status(true, 0, 10), "OUT_OF_STOCK");
        assert_eq!(stock_status(true, 4, 10), "LOW_STOCK");
        assert_eq!(stock_status(true, 10, 10), "IN_STOCK");
        assert_eq!(stock_status(false, 0, 10), "UNTRACKED");
    }
}
