//! Shared application state for the watcher's Axum server.

use std::sync::Arc;

use crible_log_tools::{LogSource, MockLogSource, QueryLimits};
use crible_protocol::SubscriberId;

/// Shared watcher state, cheap to clone into every handler.
#[derive(Clone)]
pub struct WatcherState {
    /// Identity this watcher registers and reports under.
    pub subscriber_id: SubscriberId,
    /// Where log files are read from.
    pub source: Arc<dyn LogSource>,
    /// Filter and limit bounds applied to every query.
    pub limits: Arc<QueryLimits>,
}

impl WatcherState {
    pub fn new(
        subscriber_id: SubscriberId,
        source: Arc<dyn LogSource>,
        limits: QueryLimits,
    ) -> Self {
        Self {
            subscriber_id,
            source,
            limits: Arc::new(limits),
        }
    }

    /// State backed by `MockLogSource::with_letters()` (for tests).
    pub fn with_sample_data(subscriber_id: SubscriberId) -> Self {
        let mut source = MockLogSource::with_letters();
        source.add_raw("empty.log", Vec::new());
        Self::new(subscriber_id, Arc::new(source), QueryLimits::default())
    }
}
