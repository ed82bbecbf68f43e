//! Shared test harness for E2E integration tests.
//!
//! Runs a real coordinator and real watchers on loopback listeners so every
//! query crosses actual HTTP boundaries: coordinator → `HttpSubscriberClient`
//! → watcher router → `FileLogSource` → files on disk.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crible_coordinator::fanout::HttpSubscriberClient;
use crible_coordinator::state::AppState;
use crible_log_tools::{FileLogSource, QueryLimits};
use crible_protocol::{Envelope, SubscriberId};
use crible_watcher::registration::{Registrar, RegistrationOutcome};
use crible_watcher::state::WatcherState;

/// Ten single-letter lines, `A` first and `J` last.
pub const LETTERS: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

/// Bind `router` on an ephemeral loopback port and serve it in the background.
async fn serve(router: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, handle)
}

/// Write `lines` to `root/name`, newline-terminated.
pub fn write_log(root: &std::path::Path, name: &str, lines: &[&str]) {
    let mut contents = lines.join("\n");
    contents.push('\n');
    std::fs::write(root.join(name), contents).unwrap();
}

/// A coordinator served on a loopback port.
pub struct TestCoordinator {
    pub state: AppState,
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestCoordinator {
    /// Start a coordinator with the given per-subscriber timeout.
    pub async fn start(timeout: Duration) -> Self {
        let client = HttpSubscriberClient::new(timeout).unwrap();
        let state = AppState::new(Arc::new(client), timeout, QueryLimits::default());
        let (addr, handle) = serve(crible_coordinator::routes::build_router(state.clone())).await;
        Self {
            state,
            addr,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Register `id` through the watcher-side registration client.
    pub async fn register(&self, id: &SubscriberId) -> RegistrationOutcome {
        Registrar::new(self.url(), Duration::from_secs(5))
            .unwrap()
            .register(id)
            .await
    }

    /// `GET /lines` with the raw query string; returns status and JSON body.
    pub async fn lines(&self, query: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let response = reqwest::get(format!("{}/lines?{query}", self.url()))
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    /// `GET /lines` decoded into typed envelopes; panics on a non-2xx reply.
    pub async fn envelopes(&self, query: &str) -> Vec<Envelope> {
        let (status, json) = self.lines(query).await;
        assert!(status.is_success(), "coordinator returned {status}: {json}");
        serde_json::from_value(json).unwrap()
    }
}

impl Drop for TestCoordinator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A watcher served on a loopback port over a temporary log directory.
pub struct TestWatcher {
    pub id: SubscriberId,
    pub addr: SocketAddr,
    pub logs: TempDir,
    handle: JoinHandle<()>,
}

impl TestWatcher {
    /// Start a watcher with default limits.
    pub async fn start() -> Self {
        Self::start_with_limits(QueryLimits::default()).await
    }

    /// Start a watcher whose own bounds differ from the coordinator's.
    pub async fn start_with_limits(limits: QueryLimits) -> Self {
        let logs = tempfile::tempdir().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let id = SubscriberId::parse(&addr.to_string()).unwrap();

        let source = FileLogSource::new(logs.path(), 64);
        let state = WatcherState::new(id.clone(), Arc::new(source), limits);
        let router = crible_watcher::routes::build_router(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            id,
            addr,
            logs,
            handle,
        }
    }

    pub fn write_log(&self, name: &str, lines: &[&str]) {
        write_log(self.logs.path(), name, lines);
    }

    /// Stop serving; later connections to `addr` are refused.
    pub async fn stop(self) -> SubscriberId {
        self.handle.abort();
        let _ = self.handle.await;
        self.id.clone()
    }
}

/// Reserve a loopback address with nothing listening on it.
pub async fn closed_address() -> SubscriberId {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    SubscriberId::parse(&addr.to_string()).unwrap()
}
