//! Range policy applied to incoming queries.

use serde::Deserialize;

use crate::error::LimitsError;

/// Bounds on `limit` and `filter`, shared by watchers and the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryLimits {
    #[serde(default = "default_min_limit")]
    pub min_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Substituted when a query carries no limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_min_filter_len")]
    pub min_filter_len: usize,
    #[serde(default = "default_max_filter_len")]
    pub max_filter_len: usize,
}

fn default_min_limit() -> usize {
    1
}
fn default_max_limit() -> usize {
    1000
}
fn default_limit() -> usize {
    10
}
fn default_min_filter_len() -> usize {
    1
}
fn default_max_filter_len() -> usize {
    100
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            min_limit: default_min_limit(),
            max_limit: default_max_limit(),
            default_limit: default_limit(),
            min_filter_len: default_min_filter_len(),
            max_filter_len: default_max_filter_len(),
        }
    }
}

impl QueryLimits {
    /// Reject configurations the validator could never satisfy.
    pub fn check(&self) -> Result<(), LimitsError> {
        if self.min_limit == 0 {
            return Err(LimitsError("min_limit must be at least 1".into()));
        }
        if self.min_limit > self.max_limit {
            return Err(LimitsError(format!(
                "min_limit {} exceeds max_limit {}",
                self.min_limit, self.max_limit
            )));
        }
        if !(self.min_limit..=self.max_limit).contains(&self.default_limit) {
            return Err(LimitsError(format!(
                "default_limit {} outside [{}, {}]",
                self.default_limit, self.min_limit, self.max_limit
            )));
        }
        if self.min_filter_len == 0 || self.min_filter_len > self.max_filter_len {
            return Err(LimitsError(format!(
                "filter length bounds [{}, {}] are invalid",
                self.min_filter_len, self.max_filter_len
            )));
        }
        Ok(())
    }
}
