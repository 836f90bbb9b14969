//! HTTP handlers for dashboard read models

use axum::{
    extract::{Query, State},
    Json,
};
use shared::{ItemDisplay, ListQuery};

use super::MovementView;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::{CategoryBreakdown, DashboardMetrics};
use crate::services::DashboardService;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 10;

pub async fn get_metrics(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    let service = DashboardService::new(state.db);
    Ok(Json(service.get_metrics(&caller).await?))
}

pub async fn get_low_stock_items(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ItemDisplay>>> {
    let service = DashboardService::new(state.db);
    let items = service
        .get_low_stock_items(&caller, query.limit_or(DEFAULT_LIMIT))
        .await?;

    let data = items
        .iter()
        .map(|item| item.to_display())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(data))
}

pub async fn get_recent_movements(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MovementView>>> {
    let service = DashboardService::new(state.db);
    let entries = service
        .get_recent_movements(&caller, query.limit_or(DEFAULT_LIMIT))
        .await?;

    let views = entries
        .into_iter()
        .map(MovementView::try_from)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(views))
}

pub async fn get_category_breakdown(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> AppResult<Json<Vec<CategoryBreakdown>>> {
    let service = DashboardService::new(state.db);
    Ok(Json(service.get_category_breakdown(&caller).await?))
}
