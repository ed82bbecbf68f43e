//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::WatcherState;

/// GET /health: liveness check.
pub async fn health(State(state): State<WatcherState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "subscriberId": state.subscriber_id,
    }))
}
