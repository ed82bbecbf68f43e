//! Fleet-wide `/lines` query.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use crible_log_tools::validate;
use crible_protocol::{Envelope, LogQuery};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /lines: run the query on every registered watcher.
///
/// The query is validated once, before any outbound call. Per-watcher
/// failures come back as error envelopes; the response itself only fails
/// when validation does.
pub async fn get_lines(
    State(state): State<AppState>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Envelope>>> {
    let Query(query) = query.map_err(|e| {
        tracing::info!(error = %e, "unparseable query string");
        ApiError::Aggregation(e.body_text())
    })?;
    let validated = validate(&query, &state.limits).map_err(|e| {
        tracing::info!(error = %e, "rejected query before fan-out");
        ApiError::Aggregation(e.to_string())
    })?;

    let subscribers = state.registry.snapshot().await;
    tracing::info!(
        filename = %validated.filename,
        filter = ?validated.filter,
        subscribers = subscribers.len(),
        "fanning out query"
    );

    let envelopes = state
        .aggregator
        .query(&subscribers, &validated, &state.limits)
        .await;
    Ok(Json(envelopes))
}
