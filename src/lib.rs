//! # webcanary
//!
//! A URL health-check pipeline: probe a target URL on an external schedule,
//! emit availability and latency as metric data points, and persist sampled
//! results as uniquely identified records in a key-value store.
//!
//! ## Pipeline
//!
//! - [`probe`]: one GET per cycle with a fixed timeout; fails soft to a
//!   zero sample.
//! - [`metrics`]: fire-and-forget publication to a metrics backend behind
//!   the [`metrics::MetricsBackend`] trait (HTTP or in-memory).
//! - [`persist`]: push-model (notification envelopes) or pull-model
//!   (lookback query) persistence of health records.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webcanary::config::Config;
//! use webcanary::handler::ProbeHandler;
//! use webcanary::metrics::HttpMetricsBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let backend = Arc::new(HttpMetricsBackend::new(config.metrics.endpoint.as_str()));
//!     let handler = ProbeHandler::new(&config, backend)?;
//!
//!     let report = handler.run().await;
//!     println!("{}", serde_json::to_string(&report)?);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod handler;
pub mod metrics;
pub mod persist;
pub mod probe;
pub mod utils;

// Re-export main types
pub use config::{Config, PersistMode};
pub use handler::{ProbeHandler, ProbeReport};
pub use metrics::{Dimension, MetricDataPoint, MetricEmitter, MetricsBackend};
pub use persist::{
    HealthRecord, InvocationResult, PullPersister, PushPersister, RecordStore,
};
pub use probe::{HealthSample, Prober};
pub use utils::error::{CanaryError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
