//! Supported measurement units

use axum::Json;
use shared::Unit;

/// The built-in unit table; public so clients can render unit pickers before login
pub async fn list_units() -> Json<&'static [Unit]> {
    Json(shared::supported_units())
}
