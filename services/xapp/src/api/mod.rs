//! HTTP API handlers and routing.

pub mod error;
mod health;
mod messages;
mod stats;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .merge(health::routes())
        .merge(stats::routes())
        .nest("/v1", messages::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
