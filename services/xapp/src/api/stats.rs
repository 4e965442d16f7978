//! Counter endpoint.

use axum::{extract::State, routing::get, Json, Router};

use crate::{state::AppState, stats::StatsSnapshot};

pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

async fn stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.dispatcher().stats())
}
