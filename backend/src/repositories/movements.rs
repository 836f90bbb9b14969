//! Stock movement rows. Append-only: there is no update or delete here; rows only go away
//! through the cascade on item deletion.

use chrono::{DateTime, Utc};
use shared::{MovementType, StockMovement};
use sqlx::{Executor, FromRow, Sqlite};
use uuid::Uuid;

use super::corrupt;
use crate::error::{AppError, AppResult};

const COLUMNS: &str = "m.id, m.item_id, m.movement_type, m.quantity, m.previous_stock, \
     m.new_stock, m.reference, m.notes, m.created_by, m.created_at, \
     i.name AS item_name, i.unit_of_measurement AS unit";

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    item_id: Uuid,
    movement_type: String,
    quantity: i64,
    previous_stock: i64,
    new_stock: i64,
    reference: Option<String>,
    notes: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    item_name: String,
    unit: String,
}

/// A movement together with the name and unit of its item
#[derive(Debug, Clone)]
pub struct MovementEntry {
    pub movement: StockMovement,
    pub item_name: String,
    pub unit: String,
}

impl TryFrom<MovementRow> for MovementEntry {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let movement_type = MovementType::from_str(&row.movement_type)
            .ok_or_else(|| corrupt("stock_movements.movement_type", &row.movement_type))?;

        Ok(MovementEntry {
            movement: StockMovement {
                id: row.id,
                item_id: row.item_id,
                movement_type,
                quantity: row.quantity,
                previous_stock: row.previous_stock,
                new_stock: row.new_stock,
                reference: row.reference,
                notes: row.notes,
                created_by: row.created_by,
                created_at: row.created_at,
            },
            item_name: row.item_name,
            unit: row.unit,
        })
    }
}

fn into_entries(rows: Vec<MovementRow>) -> AppResult<Vec<MovementEntry>> {
    rows.into_iter().map(MovementEntry::try_from).collect()
}

pub async fn insert<'e, E>(executor: E, movement: &StockMovement) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            id, item_id, movement_type, quantity, previous_stock, new_stock,
            reference, notes, created_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(movement.id)
    .bind(movement.item_id)
    .bind(movement.movement_type.as_str())
    .bind(movement.quantity)
    .bind(movement.previous_stock)
    .bind(movement.new_stock)
    .bind(&movement.reference)
    .bind(&movement.notes)
    .bind(movement.created_by)
    .bind(movement.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn find<'e, E>(
    executor: E,
    organization_id: Uuid,
    id: Uuid,
) -> AppResult<Option<MovementEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, MovementRow>(&format!(
        r#"
        SELECT {} FROM stock_movements m
        JOIN items i ON i.id = m.item_id
        WHERE m.id = ? AND i.organization_id = ?
        "#,
        COLUMNS
    ))
    .bind(id)
    .bind(organization_id)
    .fetch_optional(executor)
    .await?;

    row.map(MovementEntry::try_from).transpose()
}

/// Movements of one item, newest first
pub async fn list_by_item<'e, E>(
    executor: E,
    organization_id: Uuid,
    item_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<MovementEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, MovementRow>(&format!(
        r#"
        SELECT {} FROM stock_movements m
        JOIN items i ON i.id = m.item_id
        WHERE m.item_id = ? AND i.organization_id = ?
        ORDER BY m.seq DESC
        LIMIT ? OFFSET ?
        "#,
        COLUMNS
    ))
    .bind(item_id)
    .bind(organization_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    into_entries(rows)
}

/// Every movement of an item in commit order, oldest first
pub async fn history<'e, E>(executor: E, item_id: Uuid) -> AppResult<Vec<StockMovement>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, MovementRow>(&format!(
        r#"
        SELECT {} FROM stock_movements m
        JOIN items i ON i.id = m.item_id
        WHERE m.item_id = ?
        ORDER BY m.seq ASC
        "#,
        COLUMNS
    ))
    .bind(item_id)
    .fetch_all(executor)
    .await?;

    Ok(into_entries(rows)?
        .into_iter()
        .map(|entry| entry.movement)
        .collect())
}

/// Movements across an organization, newest first
pub async fn list_by_organization<'e, E>(
    executor: E,
    organization_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<MovementEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, MovementRow>(&format!(
        r#"
        SELECT {} FROM stock_movements m
        JOIN items i ON i.id = m.item_id
        WHERE i.organization_id = ?
        ORDER BY m.seq DESC
        LIMIT ? OFFSET ?
        "#,
        COLUMNS
    ))
    .bind(organization_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    into_entries(rows)
}

pub async fn count_since<'e, E>(
    executor: E,
    organization_id: Uuid,
    since: DateTime<Utc>,
) -> AppResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM stock_movements m
        JOIN items i ON i.id = m.item_id
        WHERE i.organization_id = ? AND m.created_at >= ?
        "#,
    )
    .bind(organization_id)
    .bind(since)
    .fetch_one(executor)
    .await?;

    Ok(total)
}
