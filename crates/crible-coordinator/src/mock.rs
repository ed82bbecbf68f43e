//! Mock subscriber client for testing fan-out without real watchers.
//!
//! Records every outbound query and answers per subscriber according to a
//! configured `MockBehavior`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crible_protocol::{LinesResponse, LogQuery, SubscriberId};

use crate::fanout::{SubscriberClient, SubscriberError};

/// How the mock answers for one subscriber.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Answer immediately with these lines.
    Lines(Vec<String>),
    /// Answer with these lines after a delay.
    DelayedLines(Duration, Vec<String>),
    /// Stall for the duration, then answer with no lines.
    Delay(Duration),
    /// Fail with the given error.
    Fail(SubscriberError),
}

/// Mock implementation of `SubscriberClient`.
///
/// Subscribers without a configured behavior answer with no lines.
/// Thread-safe via `Mutex` (fine for test contexts).
pub struct MockSubscriberClient {
    behaviors: HashMap<String, MockBehavior>,
    requests: Mutex<Vec<(SubscriberId, LogQuery)>>,
}

impl MockSubscriberClient {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Configure the behavior for `subscriber_id`.
    pub fn set(&mut self, subscriber_id: &str, behavior: MockBehavior) {
        self.behaviors.insert(subscriber_id.to_string(), behavior);
    }

    /// Every `(subscriber, query)` pair seen so far, in call order.
    pub fn requests(&self) -> Vec<(SubscriberId, LogQuery)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockSubscriberClient {
    fn default() -> Self {
        Self::new()
    }
}

fn respond(subscriber: &SubscriberId, query: &LogQuery, lines: Vec<String>) -> LinesResponse {
    LinesResponse {
        subscriber_id: subscriber.to_string(),
        filename: query.filename.clone().unwrap_or_default(),
        filter: query.filter.clone(),
        limit: query
            .limit
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(lines.len()),
        lines,
    }
}

#[async_trait]
impl SubscriberClient for MockSubscriberClient {
    async fn fetch_lines(
        &self,
        subscriber: &SubscriberId,
        query: &LogQuery,
    ) -> Result<LinesResponse, SubscriberError> {
        self.requests
            .lock()
            .unwrap()
            .push((subscriber.clone(), query.clone()));

        match self.behaviors.get(subscriber.as_str()).cloned() {
            None => Ok(respond(subscriber, query, Vec::new())),
            Some(MockBehavior::Lines(lines)) => Ok(respond(subscriber, query, lines)),
            Some(MockBehavior::DelayedLines(delay, lines)) => {
                tokio::time::sleep(delay).await;
                Ok(respond(subscriber, query, lines))
            }
            Some(MockBehavior::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(respond(subscriber, query, Vec::new()))
            }
            Some(MockBehavior::Fail(err)) => Err(err),
        }
    }
}
