//! HTTP handlers for stock movements

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{CreateMovementRequest, ListQuery, StockMovementDisplay};
use uuid::Uuid;
use validator::Validate;

use super::MovementView;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::AppState;

/// Record a stock movement. Open to every authenticated role.
pub async fn create_movement(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(input): Json<CreateMovementRequest>,
) -> AppResult<(StatusCode, Json<StockMovementDisplay>)> {
    input.validate()?;

    let (movement, item) = state
        .inventory_service()
        .record_movement(&caller, input)
        .await?;

    let display = movement.to_display(&item.unit_of_measurement)?;
    Ok((StatusCode::CREATED, Json(display)))
}

pub async fn list_movements(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MovementView>>> {
    let entries = state.inventory_service().list_movements(&caller, query).await?;

    let views = entries
        .into_iter()
        .map(MovementView::try_from)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(views))
}

pub async fn get_movement(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(movement_id): Path<Uuid>,
) -> AppResult<Json<MovementView>> {
    let entry = state
        .inventory_service()
        .get_movement(&caller, movement_id)
        .await?;
    Ok(Json(MovementView::try_from(entry)?))
}
