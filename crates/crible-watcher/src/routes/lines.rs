//! Single-host `/lines` query.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use crible_log_tools::validate;
use crible_protocol::{LinesResponse, LogQuery};

use crate::error::{ApiError, ApiResult};
use crate::state::WatcherState;

/// GET /lines: newest lines of one local log file.
///
/// Validation failures are 400s and never reach the filesystem; scan
/// failures (including a missing file) are 500s.
pub async fn get_lines(
    State(state): State<WatcherState>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> ApiResult<Json<LinesResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    tracing::info!(
        filename = ?query.filename,
        filter = ?query.filter,
        limit = ?query.limit,
        "GET /lines"
    );

    let validated = validate(&query, &state.limits).inspect_err(|e| {
        tracing::info!(error = %e, "rejected query");
    })?;
    let limit = validated.effective_limit(&state.limits);

    let lines = state
        .source
        .tail_lines(&validated.filename, validated.filter.as_deref(), limit)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                path = %state.source.describe(&validated.filename),
                "scan failed"
            );
        })?;

    tracing::info!(
        count = lines.len(),
        path = %state.source.describe(&validated.filename),
        "returning lines"
    );

    Ok(Json(LinesResponse {
        subscriber_id: state.subscriber_id.to_string(),
        filename: validated.filename,
        filter: validated.filter,
        limit,
        lines,
    }))
}
