//! API route definitions.

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Block submission
        .route("/blocks", post(handlers::blocks::submit_block))
        // Balance queries; an empty address segment is a 400, not a 404
        .route("/balance/:address", get(handlers::balances::get_balance))
        .route("/balance", get(handlers::balances::missing_address))
        .route("/balance/", get(handlers::balances::missing_address))
        // Rollback
        .route("/rollback", post(handlers::rollback::rollback))
        // Status
        .route("/status", get(handlers::status::get_status))
        // Apply middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
