//! Shared application state for the coordinator's Axum server.

use std::sync::Arc;
use std::time::Duration;

use crible_log_tools::QueryLimits;

use crate::fanout::{Aggregator, SubscriberClient};
use crate::mock::MockSubscriberClient;
use crate::registry::SubscriberRegistry;

/// Shared coordinator state, wrapped in `Arc`s for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    /// Registered watchers.
    pub registry: Arc<SubscriberRegistry>,
    /// Fan-out engine used by `/lines`.
    pub aggregator: Arc<Aggregator>,
    /// Bounds checked before any fan-out.
    pub limits: Arc<QueryLimits>,
}

impl AppState {
    pub fn new(client: Arc<dyn SubscriberClient>, timeout: Duration, limits: QueryLimits) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new()),
            aggregator: Arc::new(Aggregator::new(client, timeout)),
            limits: Arc::new(limits),
        }
    }

    /// State backed by a `MockSubscriberClient` (for tests).
    pub fn with_mock(client: MockSubscriberClient, timeout: Duration) -> Self {
        Self::new(Arc::new(client), timeout, QueryLimits::default())
    }
}
