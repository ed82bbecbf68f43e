use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reasons a subscriber id is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriberIdError {
    #[error("subscriber id is empty")]
    Empty,

    #[error("subscriber id '{0}' is not of the form host:port")]
    MissingPort(String),

    #[error("subscriber id '{0}' has an invalid port")]
    InvalidPort(String),

    #[error("subscriber id '{0}' contains forbidden characters")]
    Forbidden(String),
}

/// Network identity of a watcher, `host:port`.
///
/// The coordinator reaches the watcher at `http://{id}`, so the id doubles
/// as its address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn parse(raw: &str) -> Result<Self, SubscriberIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SubscriberIdError::Empty);
        }
        if raw
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '@'))
        {
            return Err(SubscriberIdError::Forbidden(raw.to_string()));
        }
        let (host, port) = raw
            .rsplit_once(':')
            .ok_or_else(|| SubscriberIdError::MissingPort(raw.to_string()))?;
        if host.is_empty() {
            return Err(SubscriberIdError::MissingPort(raw.to_string()));
        }
        match port.parse::<u16>() {
            Ok(p) if p > 0 => Ok(Self(raw.to_string())),
            _ => Err(SubscriberIdError::InvalidPort(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base URL the coordinator uses to reach this watcher.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.0)
    }
}

impl TryFrom<String> for SubscriberId {
    type Error = SubscriberIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SubscriberId> for String {
    fn from(id: SubscriberId) -> Self {
        id.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry entry as exposed by the coordinator's `/subscribers` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberInfo {
    pub subscriber_id: SubscriberId,
    pub registered_at: DateTime<Utc>,
}
