//! Crible Watcher: serves the newest lines of local log files.
//!
//! Binds the `/lines` endpoint over the configured log root, then makes one
//! best-effort registration call to the coordinator.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crible_log_tools::FileLogSource;
use crible_watcher::config::WatcherConfig;
use crible_watcher::registration::Registrar;
use crible_watcher::routes;
use crible_watcher::state::WatcherState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "crible-watcher starting");

    // ── Load config ─────────────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => WatcherConfig::from_file(&path)?,
        None => WatcherConfig::from_env()?,
    };
    let subscriber_id = config.subscriber_id()?;
    tracing::info!(
        subscriber_id = %subscriber_id,
        log_root = %config.log_root.display(),
        block_size = config.block_size,
        "config loaded"
    );

    let source = FileLogSource::new(&config.log_root, config.block_size);
    let state = WatcherState::new(subscriber_id.clone(), Arc::new(source), config.limits.clone());
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    // ── Register with the coordinator (best effort, once) ───────
    let registrar = Registrar::new(
        config.coordinator_url.clone(),
        Duration::from_secs(config.register_timeout_secs),
    )?;
    tokio::spawn(async move {
        registrar.register(&subscriber_id).await;
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("crible-watcher stopped");
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
