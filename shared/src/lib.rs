//! Shared types and models for the stock ledger
//!
//! This crate contains types shared between the backend, the browser client (via WASM),
//! and other components of the system. It performs no I/O.

pub mod models;
pub mod types;
pub mod units;
pub mod validation;

pub use models::*;
pub use types::*;
pub use units::{
    convert_between_units, from_base_unit, lookup_unit, supported_units, to_base_unit,
    validate_unit, Unit, UnitError,
};
pub use validation::*;
