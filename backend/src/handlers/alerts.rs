//! HTTP handlers for the alert inbox

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shared::{Alert, ListQuery};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::AlertService;
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

pub async fn list_alerts(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Alert>>> {
    let service = AlertService::new(state.db);
    Ok(Json(service.list_alerts(caller.organization_id, query).await?))
}

pub async fn list_unread_alerts(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Alert>>> {
    let service = AlertService::new(state.db);
    Ok(Json(
        service
            .list_unread_alerts(caller.organization_id, query)
            .await?,
    ))
}

pub async fn mark_alert_read(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = AlertService::new(state.db);
    service
        .mark_alert_read(caller.organization_id, alert_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_alerts_read(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> AppResult<Json<MarkAllReadResponse>> {
    let service = AlertService::new(state.db);
    let updated = service.mark_all_alerts_read(caller.organization_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
