//! HTTP handlers for item endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{
    CreateItemRequest, ItemDisplay, ItemFilter, ListQuery, PaginatedResponse, UpdateItemRequest,
};
use uuid::Uuid;
use validator::Validate;

use super::MovementView;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::AppState;

/// List items with optional search, category and low-stock filters
pub async fn list_items(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(filter): Query<ItemFilter>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<ItemDisplay>>> {
    let service = state.inventory_service();
    let items = service.list_items(&caller, &filter, query).await?;
    let total = service.count_items(&caller, &filter).await?;

    let data = items
        .iter()
        .map(|item| item.to_display())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PaginatedResponse {
        data,
        total,
        limit: query.limit_or(50),
        offset: query.offset(),
    }))
}

/// Create an item; quantities are read in the item's unit
pub async fn create_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(input): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemDisplay>)> {
    input.validate()?;
    let new_item = input.into_new_item()?;

    let item = state.inventory_service().create_item(&caller, new_item).await?;
    Ok((StatusCode::CREATED, Json(item.to_display()?)))
}

pub async fn get_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemDisplay>> {
    let item = state.inventory_service().get_item(&caller, item_id).await?;
    Ok(Json(item.to_display()?))
}

pub async fn update_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<Json<ItemDisplay>> {
    input.validate()?;
    let service = state.inventory_service();

    let current = service.get_item(&caller, item_id).await?;
    let changes = input.into_changes(&current.unit_of_measurement)?;

    let item = service.update_item(&caller, item_id, changes).await?;
    Ok(Json(item.to_display()?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.inventory_service().delete_item(&caller, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Movements of one item, newest first
pub async fn list_item_movements(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(item_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MovementView>>> {
    let entries = state
        .inventory_service()
        .list_item_movements(&caller, item_id, query)
        .await?;

    let views = entries
        .into_iter()
        .map(MovementView::try_from)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(views))
}
