//! Fan-out aggregation across registered watchers.
//!
//! One outbound call per subscriber, all in flight at once, each bounded by
//! its own timeout. A failed or slow subscriber turns into an error envelope
//! and never cancels or delays its siblings beyond the timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;

use crible_log_tools::{QueryLimits, ValidatedQuery};
use crible_protocol::{Envelope, LinesResponse, LogQuery, SubscriberId};

/// Why one subscriber produced no lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriberError {
    #[error("subscriber unreachable: {0}")]
    Unreachable(String),

    #[error("subscriber timed out after {0} ms")]
    Timeout(u64),

    #[error("subscriber returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed subscriber response: {0}")]
    Malformed(String),
}

/// Outbound call to a single watcher's `/lines` endpoint.
#[async_trait]
pub trait SubscriberClient: Send + Sync {
    async fn fetch_lines(
        &self,
        subscriber: &SubscriberId,
        query: &LogQuery,
    ) -> Result<LinesResponse, SubscriberError>;
}

/// `SubscriberClient` over HTTP.
pub struct HttpSubscriberClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSubscriberClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    fn transport_error(&self, err: reqwest::Error) -> SubscriberError {
        if err.is_timeout() {
            SubscriberError::Timeout(self.timeout.as_millis() as u64)
        } else {
            SubscriberError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl SubscriberClient for HttpSubscriberClient {
    async fn fetch_lines(
        &self,
        subscriber: &SubscriberId,
        query: &LogQuery,
    ) -> Result<LinesResponse, SubscriberError> {
        let url = format!("{}/lines", subscriber.base_url());
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            // Watchers answer errors with `{ "error": ... }`; fall back to
            // the raw body for anything else.
            let body = response
                .text()
                .await
                .map_err(|e| self.transport_error(e))?;
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(String::from))
                .unwrap_or(body);
            return Err(SubscriberError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<LinesResponse>().await.map_err(|e| {
            if e.is_timeout() {
                SubscriberError::Timeout(self.timeout.as_millis() as u64)
            } else {
                SubscriberError::Malformed(e.to_string())
            }
        })
    }
}

/// Runs one validated query against a set of subscribers.
pub struct Aggregator {
    client: Arc<dyn SubscriberClient>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(client: Arc<dyn SubscriberClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query every subscriber concurrently.
    ///
    /// Returns one envelope per subscriber, in the order given, once every
    /// call has completed or timed out.
    pub async fn query(
        &self,
        subscribers: &[SubscriberId],
        query: &ValidatedQuery,
        limits: &QueryLimits,
    ) -> Vec<Envelope> {
        let wire = query.to_log_query(limits);
        let limit = query.effective_limit(limits);

        let calls = subscribers.iter().map(|id| {
            let wire = &wire;
            async move {
                let outcome =
                    match tokio::time::timeout(self.timeout, self.client.fetch_lines(id, wire))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(SubscriberError::Timeout(self.timeout.as_millis() as u64)),
                    };

                match outcome {
                    Ok(response) => {
                        tracing::debug!(
                            subscriber_id = %id,
                            count = response.lines.len(),
                            "subscriber answered"
                        );
                        Envelope::success(id.clone(), response)
                    }
                    Err(e) => {
                        tracing::warn!(subscriber_id = %id, error = %e, "subscriber query failed");
                        Envelope::failure(
                            id.clone(),
                            query.filename.clone(),
                            query.filter.clone(),
                            limit,
                            e.to_string(),
                        )
                    }
                }
            }
        });

        let envelopes = join_all(calls).await;
        tracing::info!(
            subscribers = envelopes.len(),
            failed = envelopes.iter().filter(|e| e.is_error()).count(),
            filename = %query.filename,
            "fan-out complete"
        );
        envelopes
    }
}
