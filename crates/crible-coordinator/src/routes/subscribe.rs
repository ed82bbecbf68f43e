//! Watcher registration endpoints.

use axum::Json;
use axum::extract::{Path, State};

use crible_protocol::{SubscriberId, SubscriberInfo};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /subscribe/{id}: idempotently register a watcher.
pub async fn subscribe(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<String> {
    tracing::info!(subscriber_id = %raw_id, "received subscription request");
    let id = SubscriberId::parse(&raw_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let reply = format!("Subscribed to {id}.");
    state.registry.register(id).await;
    Ok(reply)
}

/// GET /subscribers: registered watchers in registration order.
pub async fn list_subscribers(State(state): State<AppState>) -> Json<Vec<SubscriberInfo>> {
    Json(state.registry.list().await)
}
