//! Configuration management for the canary pipeline
//!
//! Configuration is environment-first: every value has a hardcoded fallback
//! default, an environment variable override, and (optionally) a YAML file
//! layered underneath the environment.

use crate::utils::error::{CanaryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming the target URL.
pub const ENV_URL_TO_MONITOR: &str = "URL_TO_MONITOR";
/// Environment variable naming the metrics namespace.
pub const ENV_NAMESPACE: &str = "URL_MONITOR_NAMESPACE";
/// Environment variable naming the destination table.
pub const ENV_TABLE_NAME: &str = "TABLE_NAME";
/// Environment variable naming the metrics backend endpoint.
pub const ENV_METRICS_ENDPOINT: &str = "METRICS_ENDPOINT";
/// Environment variable naming the record store URL.
pub const ENV_REDIS_URL: &str = "REDIS_URL";
/// Environment variable selecting the persistence mode.
pub const ENV_PERSIST_MODE: &str = "PERSIST_MODE";

/// Main configuration struct for the canary pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Probe configuration
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Metrics backend configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Persistence configuration
    #[serde(default)]
    pub persist: PersistConfig,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// hardcoded defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, then layer environment
    /// overrides on top (environment wins).
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CanaryError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| CanaryError::Config(format!("Failed to parse config: {}", e)))?;

        config.apply_env_overrides()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_URL_TO_MONITOR) {
            self.probe.url = url;
        }
        if let Ok(namespace) = std::env::var(ENV_NAMESPACE) {
            self.metrics.namespace = namespace;
        }
        if let Ok(endpoint) = std::env::var(ENV_METRICS_ENDPOINT) {
            self.metrics.endpoint = endpoint;
        }
        if let Ok(table) = std::env::var(ENV_TABLE_NAME) {
            self.persist.table_name = table;
        }
        if let Ok(redis_url) = std::env::var(ENV_REDIS_URL) {
            self.persist.redis_url = redis_url;
        }
        if let Ok(mode) = std::env::var(ENV_PERSIST_MODE) {
            self.persist.mode = mode.parse()?;
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if self.probe.url.is_empty() {
            return Err(CanaryError::Validation("Target URL cannot be empty".to_string()));
        }
        if self.probe.timeout_secs == 0 {
            return Err(CanaryError::Validation(
                "Probe timeout must be at least 1 second".to_string(),
            ));
        }
        if self.metrics.namespace.is_empty() {
            return Err(CanaryError::Validation(
                "Metrics namespace cannot be empty".to_string(),
            ));
        }
        url::Url::parse(&self.metrics.endpoint).map_err(|e| {
            CanaryError::Validation(format!(
                "Invalid metrics endpoint {:?}: {}",
                self.metrics.endpoint, e
            ))
        })?;
        if self.persist.table_name.is_empty() {
            return Err(CanaryError::Validation("Table name cannot be empty".to_string()));
        }
        if self.persist.lookback_minutes == 0 || self.persist.period_secs == 0 {
            return Err(CanaryError::Validation(
                "Lookback window and period must be non-zero".to_string(),
            ));
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}

/// Probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Target URL to monitor; a bare host/path is probed over HTTPS
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Metrics backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Namespace that all emitted data points are published under
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Base URL of the metrics backend
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            endpoint: default_metrics_endpoint(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistConfig {
    /// Which persistence contract the binary wires up
    #[serde(default)]
    pub mode: PersistMode,
    /// Destination table for health records
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// Record store connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Pull model: lookback window in minutes
    #[serde(default = "default_lookback_minutes")]
    pub lookback_minutes: u32,
    /// Pull model: query granularity in seconds
    #[serde(default = "default_period_secs")]
    pub period_secs: u32,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            mode: PersistMode::default(),
            table_name: default_table_name(),
            redis_url: default_redis_url(),
            lookback_minutes: default_lookback_minutes(),
            period_secs: default_period_secs(),
        }
    }
}

/// Persistence contract selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Consume notification envelopes delivered to the persister
    #[default]
    Push,
    /// Query the metrics backend for the most recent data points
    Pull,
}

impl std::str::FromStr for PersistMode {
    type Err = CanaryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "push" => Ok(Self::Push),
            "pull" => Ok(Self::Pull),
            other => Err(CanaryError::Config(format!(
                "Unknown persist mode {:?} (expected \"push\" or \"pull\")",
                other
            ))),
        }
    }
}

fn default_url() -> String {
    "www.bbc.com".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_namespace() -> String {
    "UrlMonitor".to_string()
}

fn default_metrics_endpoint() -> String {
    "http://127.0.0.1:9090".to_string()
}

fn default_table_name() -> String {
    "WebHealthTable".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_lookback_minutes() -> u32 {
    5
}

fn default_period_secs() -> u32 {
    60
}
