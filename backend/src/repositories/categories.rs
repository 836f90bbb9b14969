//! Category rows

use chrono::{DateTime, Utc};
use shared::Category;
use sqlx::{Executor, FromRow, Sqlite};
use uuid::Uuid;

use crate::error::AppResult;

const COLUMNS: &str = "id, organization_id, name, description, color, created_at, updated_at";

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    description: Option<String>,
    color: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            description: row.description,
            color: row.color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn insert<'e, E>(executor: E, category: &Category) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(&format!(
        "INSERT INTO categories ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
        COLUMNS
    ))
    .bind(category.id)
    .bind(category.organization_id)
    .bind(&category.name)
    .bind(&category.description)
    .bind(&category.color)
    .bind(category.created_at)
    .bind(category.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Look a category up by id regardless of organization
pub async fn find_any<'e, E>(executor: E, id: Uuid) -> AppResult<Option<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {} FROM categories WHERE id = ?",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Category::from))
}

pub async fn find<'e, E>(executor: E, organization_id: Uuid, id: Uuid) -> AppResult<Option<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {} FROM categories WHERE id = ? AND organization_id = ?",
        COLUMNS
    ))
    .bind(id)
    .bind(organization_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Category::from))
}

/// Load a category as the first write of the surrounding transaction, so the transaction
/// waits for the write lock up front instead of failing to upgrade a read later
pub async fn lock_for_update<'e, E>(
    executor: E,
    organization_id: Uuid,
    id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Option<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "UPDATE categories SET updated_at = ? WHERE id = ? AND organization_id = ? RETURNING {}",
        COLUMNS
    ))
    .bind(now)
    .bind(id)
    .bind(organization_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Category::from))
}

pub async fn list<'e, E>(executor: E, organization_id: Uuid) -> AppResult<Vec<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {} FROM categories WHERE organization_id = ? ORDER BY name COLLATE NOCASE ASC",
        COLUMNS
    ))
    .bind(organization_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Category::from).collect())
}

pub async fn update<'e, E>(executor: E, category: &Category) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        UPDATE categories
        SET name = ?, description = ?, color = ?, updated_at = ?
        WHERE id = ? AND organization_id = ?
        "#,
    )
    .bind(&category.name)
    .bind(&category.description)
    .bind(&category.color)
    .bind(category.updated_at)
    .bind(category.id)
    .bind(category.organization_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> AppResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
