//! Item rows

use chrono::{DateTime, Utc};
use shared::{Item, ItemFilter};
use sqlx::{Executor, FromRow, Sqlite};
use uuid::Uuid;

use super::parse_decimal;
use crate::error::{AppError, AppResult};

const COLUMNS: &str = "id, organization_id, category_id, name, sku, unit_of_measurement, \
     minimum_threshold, current_stock, unit_cost, is_active, track_stock, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    organization_id: Uuid,
    category_id: Uuid,
    name: String,
    sku: Option<String>,
    unit_of_measurement: String,
    minimum_threshold: i64,
    current_stock: i64,
    unit_cost: Option<String>,
    is_active: bool,
    track_stock: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = AppError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Item {
            id: row.id,
            organization_id: row.organization_id,
            category_id: row.category_id,
            name: row.name,
            sku: row.sku,
            unit_of_measurement: row.unit_of_measurement,
            minimum_threshold: row.minimum_threshold,
            current_stock: row.current_stock,
            unit_cost: parse_decimal("items.unit_cost", row.unit_cost)?,
            is_active: row.is_active,
            track_stock: row.track_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_items(rows: Vec<ItemRow>) -> AppResult<Vec<Item>> {
    rows.into_iter().map(Item::try_from).collect()
}

pub async fn insert<'e, E>(executor: E, item: &Item) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(&format!(
        "INSERT INTO items ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        COLUMNS
    ))
    .bind(item.id)
    .bind(item.organization_id)
    .bind(item.category_id)
    .bind(&item.name)
    .bind(&item.sku)
    .bind(&item.unit_of_measurement)
    .bind(item.minimum_threshold)
    .bind(item.current_stock)
    .bind(item.unit_cost.map(|c| c.to_string()))
    .bind(item.is_active)
    .bind(item.track_stock)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn find<'e, E>(executor: E, organization_id: Uuid, id: Uuid) -> AppResult<Option<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        "SELECT {} FROM items WHERE id = ? AND organization_id = ?",
        COLUMNS
    ))
    .bind(id)
    .bind(organization_id)
    .fetch_optional(executor)
    .await?;

    row.map(Item::try_from).transpose()
}

/// Load an item as the first write of the surrounding transaction. Touching the row makes
/// SQLite hand this connection the write lock before `current_stock` is read, so no other
/// writer can interleave until commit or rollback.
pub async fn lock_for_update<'e, E>(
    executor: E,
    organization_id: Uuid,
    id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Option<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        "UPDATE items SET updated_at = ? WHERE id = ? AND organization_id = ? RETURNING {}",
        COLUMNS
    ))
    .bind(now)
    .bind(id)
    .bind(organization_id)
    .fetch_optional(executor)
    .await?;

    row.map(Item::try_from).transpose()
}

/// Take the write lock with a no-op write and return the item as it stands, in any
/// organization
pub async fn lock_current<'e, E>(executor: E, id: Uuid) -> AppResult<Option<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        "UPDATE items SET current_stock = current_stock WHERE id = ? RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Item::try_from).transpose()
}

pub async fn set_stock<'e, E>(
    executor: E,
    id: Uuid,
    current_stock: i64,
    now: DateTime<Utc>,
) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE items SET current_stock = ?, updated_at = ? WHERE id = ?")
        .bind(current_stock)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Write every editable field of `item`. `current_stock` is left alone.
pub async fn update<'e, E>(executor: E, item: &Item) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        UPDATE items
        SET category_id = ?, name = ?, sku = ?, unit_of_measurement = ?,
            minimum_threshold = ?, unit_cost = ?, is_active = ?, track_stock = ?,
            updated_at = ?
        WHERE id = ? AND organization_id = ?
        "#,
    )
    .bind(item.category_id)
    .bind(&item.name)
    .bind(&item.sku)
    .bind(&item.unit_of_measurement)
    .bind(item.minimum_threshold)
    .bind(item.unit_cost.map(|c| c.to_string()))
    .bind(item.is_active)
    .bind(item.track_stock)
    .bind(item.updated_at)
    .bind(item.id)
    .bind(item.organization_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete<'e, E>(executor: E, organization_id: Uuid, id: Uuid) -> AppResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM items WHERE id = ? AND organization_id = ?")
        .bind(id)
        .bind(organization_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

const FILTER: &str = r#"
    WHERE organization_id = ?
      AND (? IS NULL OR LOWER(name) LIKE ? OR LOWER(COALESCE(sku, '')) LIKE ?)
      AND (? IS NULL OR category_id = ?)
      AND (? = 0 OR (track_stock = 1 AND current_stock < minimum_threshold))
"#;

fn search_pattern(filter: &ItemFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.to_lowercase()))
}

pub async fn list<'e, E>(
    executor: E,
    organization_id: Uuid,
    filter: &ItemFilter,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let pattern = search_pattern(filter);
    let rows = sqlx::query_as::<_, ItemRow>(&format!(
        "SELECT {} FROM items {} ORDER BY name COLLATE NOCASE ASC, id ASC LIMIT ? OFFSET ?",
        COLUMNS, FILTER
    ))
    .bind(organization_id)
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(filter.category_id)
    .bind(filter.category_id)
    .bind(filter.low_stock_only)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    into_items(rows)
}

pub async fn count<'e, E>(executor: E, organization_id: Uuid, filter: &ItemFilter) -> AppResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let pattern = search_pattern(filter);
    let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM items {}", FILTER))
        .bind(organization_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(filter.category_id)
        .bind(filter.category_id)
        .bind(filter.low_stock_only)
        .fetch_one(executor)
        .await?;

    Ok(total)
}

/// Active items of an organization, for read models
pub async fn list_active<'e, E>(executor: E, organization_id: Uuid) -> AppResult<Vec<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, ItemRow>(&format!(
        "SELECT {} FROM items WHERE organization_id = ? AND is_active = 1 ORDER BY name COLLATE NOCASE ASC",
        COLUMNS
    ))
    .bind(organization_id)
    .fetch_all(executor)
    .await?;

    into_items(rows)
}

/// Tracked, active items with some stock left but below threshold, largest deficit first
pub async fn list_low_stock<'e, E>(
    executor: E,
    organization_id: Uuid,
    limit: i64,
) -> AppResult<Vec<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, ItemRow>(&format!(
        r#"
        SELECT {} FROM items
        WHERE organization_id = ?
          AND is_active = 1
          AND track_stock = 1
          AND current_stock > 0
          AND current_stock < minimum_threshold
        ORDER BY (minimum_threshold - current_stock) DESC, name ASC
        LIMIT ?
        "#,
        COLUMNS
    ))
    .bind(organization_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    into_items(rows)
}

pub async fn count_in_category<'e, E>(executor: E, category_id: Uuid) -> AppResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE category_id = ?")
        .bind(category_id)
        .fetch_one(executor)
        .await?;

    Ok(total)
}

pub async fn reassign_category<'e, E>(
    executor: E,
    from_category: Uuid,
    to_category: Uuid,
    now: DateTime<Utc>,
) -> AppResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE items SET category_id = ?, updated_at = ? WHERE category_id = ?")
            .bind(to_category)
            .bind(now)
            .bind(from_category)
            .execute(executor)
            .await?;

    Ok(result.rows_affected())
}
