//! Alert rows

use chrono::{DateTime, Utc};
use shared::{Alert, AlertSeverity, AlertType, NewAlert};
use sqlx::{Executor, FromRow, Sqlite};
use uuid::Uuid;

use super::corrupt;
use crate::error::{AppError, AppResult};

const COLUMNS: &str =
    "id, organization_id, item_id, alert_type, severity, title, message, is_read, created_at";

#[derive(Debug, FromRow)]
struct AlertRow {
    id: Uuid,
    organization_id: Uuid,
    item_id: Option<Uuid>,
    alert_type: String,
    severity: String,
    title: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = AppError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            id: row.id,
            organization_id: row.organization_id,
            item_id: row.item_id,
            alert_type: AlertType::from_str(&row.alert_type)
                .ok_or_else(|| corrupt("alerts.alert_type", &row.alert_type))?,
            severity: AlertSeverity::from_str(&row.severity)
                .ok_or_else(|| corrupt("alerts.severity", &row.severity))?,
            title: row.title,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

pub async fn insert<'e, E>(executor: E, alert: NewAlert, now: DateTime<Utc>) -> AppResult<Alert>
where
    E: Executor<'e, Database = Sqlite>,
{
    let alert = Alert {
        id: Uuid::new_v4(),
        organization_id: alert.organization_id,
        item_id: alert.item_id,
        alert_type: alert.alert_type,
        severity: alert.severity,
        title: alert.title,
        message: alert.message,
        is_read: false,
        created_at: now,
    };

    sqlx::query(&format!(
        "INSERT INTO alerts ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        COLUMNS
    ))
    .bind(alert.id)
    .bind(alert.organization_id)
    .bind(alert.item_id)
    .bind(alert.alert_type.as_str())
    .bind(alert.severity.as_str())
    .bind(&alert.title)
    .bind(&alert.message)
    .bind(alert.is_read)
    .bind(alert.created_at)
    .execute(executor)
    .await?;

    Ok(alert)
}

pub async fn delete_for_item<'e, E>(executor: E, item_id: Uuid) -> AppResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM alerts WHERE item_id = ?")
        .bind(item_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Alerts of an organization, newest first
pub async fn list<'e, E>(
    executor: E,
    organization_id: Uuid,
    unread_only: bool,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Alert>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, AlertRow>(&format!(
        r#"
        SELECT {} FROM alerts
        WHERE organization_id = ? AND (? = 0 OR is_read = 0)
        ORDER BY seq DESC
        LIMIT ? OFFSET ?
        "#,
        COLUMNS
    ))
    .bind(organization_id)
    .bind(unread_only)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(Alert::try_from).collect()
}

pub async fn list_for_item<'e, E>(executor: E, item_id: Uuid) -> AppResult<Vec<Alert>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, AlertRow>(&format!(
        "SELECT {} FROM alerts WHERE item_id = ? ORDER BY seq ASC",
        COLUMNS
    ))
    .bind(item_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(Alert::try_from).collect()
}

pub async fn mark_read<'e, E>(executor: E, organization_id: Uuid, id: Uuid) -> AppResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE alerts SET is_read = 1 WHERE id = ? AND organization_id = ?")
        .bind(id)
        .bind(organization_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn mark_all_read<'e, E>(executor: E, organization_id: Uuid) -> AppResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE alerts SET is_read = 1 WHERE organization_id = ? AND is_read = 0")
            .bind(organization_id)
            .execute(executor)
            .await?;

    Ok(result.rows_affected())
}
