//! Low-stock alerts
//!
//! Alerts are derived from item state and never authoritative. They are raised when stock is
//! observed below threshold and deleted wholesale once it is observed at or above it again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::from_base_unit;

use super::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LowStock,
    /// Reserved; no rule raises it yet
    OutOfStock,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowStock => "LOW_STOCK",
            AlertType::OutOfStock => "OUT_OF_STOCK",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LOW_STOCK" => Some(AlertType::LowStock),
            "OUT_OF_STOCK" => Some(AlertType::OutOfStock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "INFO",
            AlertSeverity::Warning => "WARNING",
            AlertSeverity::Critical => "CRITICAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "INFO" => Some(AlertSeverity::Info),
            "WARNING" => Some(AlertSeverity::Warning),
            "CRITICAL" => Some(AlertSeverity::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub organization_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// An alert about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub organization_id: Uuid,
    pub item_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
}

impl NewAlert {
    /// LOW_STOCK warning for `item`. Quantities are shown in the item's unit, falling back to
    /// raw base units if the unit code no longer resolves.
    pub fn low_stock(item: &Item) -> Self {
        let unit = item.unit_of_measurement.as_str();
        let shown = |value: i64| match from_base_unit(value, unit) {
            Ok(v) => format!("{} {}", v, unit),
            Err(_) => value.to_string(),
        };

        Self {
            organization_id: item.organization_id,
            item_id: Some(item.id),
            alert_type: AlertType::LowStock,
            severity: AlertSeverity::Warning,
            title: format!("Low Stock: {}", item.name),
            message: format!(
                "Item '{}' is below minimum threshold. Current stock: {}, Threshold: {}",
                item.name,
                shown(item.current_stock),
                shown(item.minimum_threshold)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_alert_text() {
        let item = Item {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            name: "Coffee beans".to_string(),
            sku: None,
            unit_of_measurement: "kg".to_string(),
            minimum_threshold: 5000,
            current_stock: 1250,
            unit_cost: None,
            is_active: true,
            track_stock: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let alert = NewAlert::low_stock(&item);
        assert_eq!(alert.alert_type, AlertType::LowStock);
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(alert.item_id, Some(item.id));
        assert_eq!(alert.title, "Low Stock: Coffee beans");
        assert!(alert.message.contains("Current stock: 1.25 kg"));
        assert!(alert.message.contains("Threshold: 5 kg"));
    }

    #[test]
    fn test_alert_enum_strings() {
        assert_eq!(AlertType::from_str("LOW_STOCK"), Some(AlertType::LowStock));
        assert_eq!(AlertType::from_str("low_stock"), None);
        assert_eq!(AlertSeverity::from_str("WARNING"), Some(AlertSeverity::Warning));
        assert_eq!(AlertSeverity::Critical.as_str(), "CRITICAL");
    }
}
