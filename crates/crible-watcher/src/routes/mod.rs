//! Watcher route definitions and router builder.

pub mod health;
pub mod lines;

use axum::Router;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::state::WatcherState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: WatcherState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/lines", get(lines::get_lines))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
