//! Category service, including deletion with item reassignment

use chrono::Utc;
use shared::{CallerIdentity, Category, CreateCategoryRequest, UpdateCategoryRequest};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::require_admin;
use crate::error::{AppError, AppResult};
use crate::repositories::{categories, items};

/// Category service
#[derive(Clone)]
pub struct CategoryService {
    db: SqlitePool,
}

fn validate_fields(name: Option<&str>, color: Option<&str>) -> AppResult<()> {
    if let Some(name) = name {
        shared::validate_category_name(name).map_err(|e| AppError::Validation {
            field: "name".to_string(),
            message: e.to_string(),
        })?;
    }
    if let Some(color) = color {
        shared::validate_hex_color(color).map_err(|e| AppError::Validation {
            field: "color".to_string(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

impl CategoryService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_category(
        &self,
        caller: &CallerIdentity,
        input: CreateCategoryRequest,
    ) -> AppResult<Category> {
        require_admin(caller)?;
        let color = shared::normalize_optional(input.color);
        validate_fields(Some(&input.name), color.as_deref())?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            organization_id: caller.organization_id,
            name: input.name.trim().to_string(),
            description: shared::normalize_optional(input.description),
            color,
            created_at: now,
            updated_at: now,
        };
        categories::insert(&self.db, &category).await?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn get_category(&self, caller: &CallerIdentity, category_id: Uuid) -> AppResult<Category> {
        categories::find(&self.db, caller.organization_id, category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    pub async fn list_categories(&self, caller: &CallerIdentity) -> AppResult<Vec<Category>> {
        categories::list(&self.db, caller.organization_id).await
    }

    /// Partial update. A blank description or color clears the field.
    pub async fn update_category(
        &self,
        caller: &CallerIdentity,
        category_id: Uuid,
        input: UpdateCategoryRequest,
    ) -> AppResult<Category> {
        require_admin(caller)?;
        let mut category = self.get_category(caller, category_id).await?;

        if let Some(name) = input.name {
            validate_fields(Some(&name), None)?;
            category.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            category.description = shared::normalize_optional(Some(description));
        }
        if let Some(color) = input.color {
            let color = shared::normalize_optional(Some(color));
            validate_fields(None, color.as_deref())?;
            category.color = color;
        }
        category.updated_at = Utc::now();

        categories::update(&self.db, &category).await?;

        tracing::info!(category_id = %category.id, "Category updated");
        Ok(category)
    }

    /// Delete a category. If it still has items they are moved to `target_category_id`
    /// first, in the same transaction; without a target the delete is refused.
    pub async fn delete_category(
        &self,
        caller: &CallerIdentity,
        category_id: Uuid,
        target_category_id: Option<Uuid>,
    ) -> AppResult<()> {
        require_admin(caller)?;

        let mut tx = self.db.begin().await?;

        categories::lock_for_update(&mut *tx, caller.organization_id, category_id, Utc::now())
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let item_count = items::count_in_category(&mut *tx, category_id).await?;
        if item_count == 0 {
            categories::delete(&mut *tx, category_id).await?;
            tx.commit().await?;
            tracing::info!(category_id = %category_id, "Category deleted");
            return Ok(());
        }

        let target_id = target_category_id.ok_or(AppError::CategoryHasItems(item_count))?;
        if target_id == category_id {
            return Err(AppError::InvalidRequest(
                "Target category must differ from the category being deleted".to_string(),
            ));
        }

        let target = categories::find_any(&mut *tx, target_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;
        if target.organization_id != caller.organization_id {
            return Err(AppError::InvalidRequest(
                "Target category belongs to another organization".to_string(),
            ));
        }

        let moved = items::reassign_category(&mut *tx, category_id, target_id, Utc::now()).await?;
        categories::delete(&mut *tx, category_id).await?;

        tx.commit().await?;

        tracing::info!(
            category_id = %category_id,
            target_category_id = %target_id,
            moved,
            "Category deleted with item reassignment"
        );
        Ok(())
    }
}
