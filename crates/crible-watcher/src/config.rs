//! Watcher configuration, loadable from TOML or environment.

use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crible_log_tools::{DEFAULT_BLOCK_SIZE, QueryLimits};
use crible_protocol::SubscriberId;

/// Top-level configuration for a watcher.
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `host:port` the coordinator should use to reach this watcher.
    /// Defaults to `127.0.0.1:{port}`.
    #[serde(default)]
    pub advertise_addr: Option<String>,
    /// Directory queried file names are resolved under.
    #[serde(default = "default_log_root")]
    pub log_root: PathBuf,
    /// Base URL of the coordinator to register with.
    #[serde(default = "default_coordinator_url")]
    pub coordinator_url: String,
    /// Bytes per backward read.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Timeout for the startup registration call.
    #[serde(default = "default_register_timeout_secs")]
    pub register_timeout_secs: u64,
    /// Filter and limit bounds.
    #[serde(default)]
    pub limits: QueryLimits,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_root() -> PathBuf {
    PathBuf::from("/var/log")
}

fn default_coordinator_url() -> String {
    "http://127.0.0.1:3002".to_string()
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

fn default_register_timeout_secs() -> u64 {
    5
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            advertise_addr: None,
            log_root: default_log_root(),
            coordinator_url: default_coordinator_url(),
            block_size: default_block_size(),
            register_timeout_secs: default_register_timeout_secs(),
            limits: QueryLimits::default(),
        }
    }
}

impl WatcherConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config: Self = toml::from_str(&contents)?;
        config.check()?;
        Ok(config)
    }

    /// Load config from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`, falling back to defaults.
    ///
    /// Recognised keys: `WATCHER_HOST`, `WATCHER_PORT`, `ADVERTISE_ADDR`,
    /// `LOG_PATH`, `COORDINATOR_URL`, `BLOCK_SIZE`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("WATCHER_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("WATCHER_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("WATCHER_PORT '{port}' is not a port"))?;
        }
        config.advertise_addr = lookup("ADVERTISE_ADDR");
        if let Some(root) = lookup("LOG_PATH") {
            config.log_root = PathBuf::from(root);
        }
        if let Some(url) = lookup("COORDINATOR_URL") {
            config.coordinator_url = url;
        }
        if let Some(size) = lookup("BLOCK_SIZE") {
            config.block_size = size
                .parse()
                .with_context(|| format!("BLOCK_SIZE '{size}' is not a number"))?;
        }
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.block_size > 0, "block_size must be at least 1");
        self.limits.check()?;
        self.subscriber_id()?;
        Ok(())
    }

    /// Identity registered with the coordinator.
    pub fn subscriber_id(&self) -> anyhow::Result<SubscriberId> {
        let addr = self
            .advertise_addr
            .clone()
            .unwrap_or_else(|| format!("127.0.0.1:{}", self.port));
        Ok(SubscriberId::parse(&addr)?)
    }
}
