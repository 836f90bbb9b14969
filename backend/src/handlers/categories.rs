//! HTTP handlers for categories

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{Category, CreateCategoryRequest, DeleteCategoryRequest, UpdateCategoryRequest};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::CategoryService;
use crate::AppState;

pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.list_categories(&caller).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    input.validate()?;
    let service = CategoryService::new(state.db);
    let category = service.create_category(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.get_category(&caller, category_id).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(input): Json<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    input.validate()?;
    let service = CategoryService::new(state.db);
    Ok(Json(
        service.update_category(&caller, category_id, input).await?,
    ))
}

/// Delete a category; the optional body names where its items go
pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(category_id): Path<Uuid>,
    body: Bytes,
) -> AppResult<StatusCode> {
    // An absent body means no target; a body that does not parse is an error
    let target = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<DeleteCategoryRequest>(&body)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e)))?
            .target_category_id
    };
    let service = CategoryService::new(state.db);
    service.delete_category(&caller, category_id, target).await?;
    Ok(StatusCode::NO_CONTENT)
}
