use serde::{Deserialize, Serialize};

use crate::subscriber::SubscriberId;

/// Body of a successful watcher `/lines` response.
///
/// Echoes the validated query so the coordinator can attribute the lines
/// without re-deriving anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinesResponse {
    /// Identity the watcher registered under.
    pub subscriber_id: String,
    pub filename: String,
    /// `None` when no filter was requested.
    pub filter: Option<String>,
    /// Effective limit after defaults were applied.
    pub limit: usize,
    /// Matching lines, newest first.
    pub lines: Vec<String>,
}

/// One subscriber's outcome within an aggregated coordinator response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub subscriber_id: SubscriberId,
    pub filename: String,
    pub filter: Option<String>,
    pub limit: usize,
    /// Lines returned by the subscriber; empty when `error` is set.
    #[serde(default)]
    pub lines: Vec<String>,
    /// Why this subscriber produced no lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// Envelope for a subscriber that answered.
    ///
    /// `subscriber_id` is the registry key the call was made for, which may
    /// differ from the id the watcher reports about itself.
    pub fn success(subscriber_id: SubscriberId, response: LinesResponse) -> Self {
        Self {
            subscriber_id,
            filename: response.filename,
            filter: response.filter,
            limit: response.limit,
            lines: response.lines,
            error: None,
        }
    }

    /// Envelope for a subscriber that failed, echoing what was asked of it.
    pub fn failure(
        subscriber_id: SubscriberId,
        filename: impl Into<String>,
        filter: Option<String>,
        limit: usize,
        error: impl Into<String>,
    ) -> Self {
        Self {
            subscriber_id,
            filename: filename.into(),
            filter,
            limit,
            lines: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON error body shared by both services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}
