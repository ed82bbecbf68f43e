//! Crible Coordinator: fans `/lines` queries out to registered watchers.
//!
//! Watchers announce themselves with `POST /subscribe/{id}`; `GET /lines`
//! runs the same query on all of them concurrently and returns one envelope
//! per watcher.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crible_coordinator::config::CoordinatorConfig;
use crible_coordinator::fanout::HttpSubscriberClient;
use crible_coordinator::routes;
use crible_coordinator::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "crible-coordinator starting");

    let config = CoordinatorConfig::from_env()?;
    tracing::info!(
        fanout_timeout_ms = config.fanout_timeout_ms,
        max_limit = config.limits.max_limit,
        "config loaded"
    );

    let client = HttpSubscriberClient::new(config.fanout_timeout())?;
    let state = AppState::new(Arc::new(client), config.fanout_timeout(), config.limits.clone());
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("crible-coordinator stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            // Without a signal handler, run until killed.
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
