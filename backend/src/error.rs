//! Error handling for the stock ledger
//!
//! Every failure a service can report is an `AppError` variant with a stable code string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::UnitError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Ledger errors
    #[error("Item not found")]
    ItemNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Movement not found")]
    MovementNotFound,

    #[error("Alert not found")]
    AlertNotFound,

    #[error("Category has {0} item(s); a target category is required")]
    CategoryHasItems(i64),

    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    // Unit conversion errors
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Value cannot be negative")]
    NegativeValue,

    #[error("Cannot convert between {from} and {to}")]
    IncompatibleUnits { from: String, to: String },

    #[error("Value out of range for unit {0}")]
    ValueOutOfRange(String),

    #[error("Operation timed out")]
    Timeout,

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<UnitError> for AppError {
    fn from(err: UnitError) -> Self {
        match err {
            UnitError::InvalidUnit(code) => AppError::InvalidUnit(code),
            UnitError::NegativeValue => AppError::NegativeValue,
            UnitError::IncompatibleUnits { from, to } => AppError::IncompatibleUnits { from, to },
            UnitError::ValueOutOfRange(code) => AppError::ValueOutOfRange(code),
            err @ UnitError::PrecisionExceeded { .. } => AppError::InvalidQuantity(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl AppError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::ItemNotFound => "ITEM_NOT_FOUND",
            AppError::CategoryNotFound => "CATEGORY_NOT_FOUND",
            AppError::MovementNotFound => "MOVEMENT_NOT_FOUND",
            AppError::AlertNotFound => "ALERT_NOT_FOUND",
            AppError::CategoryHasItems(_) => "CATEGORY_HAS_ITEMS",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::InvalidQuantity(_) => "INVALID_QUANTITY",
            AppError::InvalidUnit(_) => "INVALID_UNIT",
            AppError::NegativeValue => "NEGATIVE_VALUE",
            AppError::IncompatibleUnits { .. } => "INCOMPATIBLE_UNITS",
            AppError::ValueOutOfRange(_) => "VALUE_OUT_OF_RANGE",
            AppError::Timeout => "TIMEOUT",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::TokenExpired | AppError::InvalidToken | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AppError::Validation { .. }
            | AppError::ValidationError(_)
            | AppError::InvalidRequest(_)
            | AppError::InvalidQuantity(_)
            | AppError::InvalidUnit(_)
            | AppError::NegativeValue
            | AppError::IncompatibleUnits { .. }
            | AppError::ValueOutOfRange(_) => StatusCode::BAD_REQUEST,
            AppError::ItemNotFound
            | AppError::CategoryNotFound
            | AppError::MovementNotFound
            | AppError::AlertNotFound => StatusCode::NOT_FOUND,
            AppError::CategoryHasItems(_) => StatusCode::CONFLICT,
            AppError::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            AppError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let field = match &self {
            AppError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                field,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_errors_map_to_app_errors() {
        let err: AppError = UnitError::InvalidUnit("oz".into()).into();
        assert_eq!(err.code(), "INVALID_UNIT");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = UnitError::IncompatibleUnits {
            from: "ltr".into(),
            to: "gm".into(),
        }
        .into();
        assert_eq!(err.code(), "INCOMPATIBLE_UNITS");

        let err: AppError = UnitError::PrecisionExceeded {
            unit: "pcs".into(),
            precision: 0,
        }
        .into();
        assert_eq!(err.code(), "INVALID_QUANTITY");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::ItemNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::CategoryHasItems(3).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InsufficientStock {
                available: 1,
                requested: 2
            }
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::InsufficientPermissions.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Timeout.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let response = AppError::Internal("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes =
            tokio_test::block_on(axum::body::to_bytes(response.into_body(), usize::MAX)).unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("secret detail"));
    }

    #[test]
    fn test_validation_error_carries_field() {
        let response = AppError::Validation {
            field: "color".into(),
            message: "Color must be a #RRGGBB hex value".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes =
            tokio_test::block_on(axum::body::to_bytes(response.into_body(), usize::MAX)).unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["field"], "color");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
