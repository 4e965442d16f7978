//! Message ingress.
//!
//! `POST /v1/messages/{message_type}` takes the raw message payload as its
//! body and answers `202 Accepted` with the dispatch outcome.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::error::ApiError;
use crate::{messaging::DispatchOutcome, state::AppState};

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub message_type: u32,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/messages/{message_type}", post(receive))
}

async fn receive(
    State(state): State<AppState>,
    Path(message_type): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let message_type: u32 = message_type.parse().map_err(|_| {
        ApiError::bad_request(
            "invalid_message_type",
            format!("message type must be a non-negative integer, got '{message_type}'"),
        )
    })?;

    let outcome = state.dispatcher().dispatch(message_type, &body).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(DispatchResponse {
            message_type,
            outcome,
        }),
    ))
}
