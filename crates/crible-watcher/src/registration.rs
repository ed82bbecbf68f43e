//! One-shot startup registration with the coordinator.
//!
//! The watcher announces itself once with `POST /subscribe/{id}`. The call is
//! best-effort: a failure is logged and the watcher keeps serving queries.
//! There is no retry.

use std::time::Duration;

use crible_protocol::SubscriberId;

/// What happened to the registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Coordinator acknowledged; carries its informational reply.
    Registered(String),
    /// Request failed or was refused; carries the reason.
    Failed(String),
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

/// Client for the coordinator's registration endpoint.
pub struct Registrar {
    client: reqwest::Client,
    coordinator_url: String,
}

impl Registrar {
    pub fn new(coordinator_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            coordinator_url: coordinator_url.into(),
        })
    }

    fn subscribe_url(&self, id: &SubscriberId) -> String {
        format!(
            "{}/subscribe/{}",
            self.coordinator_url.trim_end_matches('/'),
            id
        )
    }

    /// Register `id` once. Never fails; the outcome is logged and returned.
    pub async fn register(&self, id: &SubscriberId) -> RegistrationOutcome {
        let url = self.subscribe_url(id);

        let response = match self.client.post(&url).body("watcher").send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, url = %url, "coordinator registration failed");
                return RegistrationOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, url = %url, "failed to read coordinator reply");
                return RegistrationOutcome::Failed(e.to_string());
            }
        };
        if !status.is_success() {
            tracing::warn!(status = %status, body = %body, "coordinator refused registration");
            return RegistrationOutcome::Failed(format!("coordinator returned {status}"));
        }

        tracing::info!(subscriber_id = %id, reply = %body, "registered with coordinator");
        RegistrationOutcome::Registered(body)
    }
}
