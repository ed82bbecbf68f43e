//! Coordinator configuration.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crible_log_tools::QueryLimits;

/// Top-level coordinator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-subscriber timeout for one fan-out call, in milliseconds.
    #[serde(default = "default_fanout_timeout_ms")]
    pub fanout_timeout_ms: u64,
    /// Filter and limit bounds, checked before any fan-out.
    #[serde(default)]
    pub limits: QueryLimits,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_fanout_timeout_ms() -> u64 {
    5000
}

impl CoordinatorConfig {
    /// Load config from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`, falling back to defaults.
    ///
    /// Recognised keys: `COORDINATOR_HOST`, `PRIMARY_PORT`,
    /// `FANOUT_TIMEOUT_MS`, `MAX_LIMIT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("COORDINATOR_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PRIMARY_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("PRIMARY_PORT '{port}' is not a port"))?;
        }
        if let Some(ms) = lookup("FANOUT_TIMEOUT_MS") {
            config.fanout_timeout_ms = ms
                .parse()
                .with_context(|| format!("FANOUT_TIMEOUT_MS '{ms}' is not a number"))?;
        }
        if let Some(max) = lookup("MAX_LIMIT") {
            config.limits.max_limit = max
                .parse()
                .with_context(|| format!("MAX_LIMIT '{max}' is not a number"))?;
        }
        anyhow::ensure!(config.fanout_timeout_ms > 0, "FANOUT_TIMEOUT_MS must be positive");
        config.limits.check()?;
        Ok(config)
    }

    pub fn fanout_timeout(&self) -> Duration {
        Duration::from_millis(self.fanout_timeout_ms)
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            fanout_timeout_ms: default_fanout_timeout_ms(),
            limits: QueryLimits::default(),
        }
    }
}
