//! Route definitions for the stock ledger API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health::health_check))
        // Unit table (public)
        .route("/units", get(handlers::units::list_units))
        // Protected routes
        .nest("/categories", category_routes(state.clone()))
        .nest("/items", item_routes(state.clone()))
        .nest("/movements", movement_routes(state.clone()))
        .nest("/alerts", alert_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state))
}

/// Category management routes
fn category_routes(state: AppState) -> Router<AppState> {
    use handlers::categories::*;

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Item management routes
fn item_routes(state: AppState) -> Router<AppState> {
    use handlers::items::*;

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/:id/movements", get(list_item_movements))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stock movement routes
fn movement_routes(state: AppState) -> Router<AppState> {
    use handlers::movements::*;

    Router::new()
        .route("/", post(create_movement).get(list_movements))
        .route("/:id", get(get_movement))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Alert inbox routes
fn alert_routes(state: AppState) -> Router<AppState> {
    use handlers::alerts::*;

    Router::new()
        .route("/", get(list_alerts))
        .route("/unread", get(list_unread_alerts))
        .route("/read-all", put(mark_all_alerts_read))
        .route("/:id/read", put(mark_alert_read))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Dashboard routes
fn dashboard_routes(state: AppState) -> Router<AppState> {
    use handlers::dashboard::*;

    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/low-stock", get(get_low_stock_items))
        .route("/recent-movements", get(get_recent_movements))
        .route("/category-breakdown", get(get_category_breakdown))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
