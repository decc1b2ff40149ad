//! Metric emission and retrieval
//!
//! Data points are published fire-and-forget to a metrics backend and, for
//! the pull-model persister, read back newest-first through a lookback
//! query. The backend itself sits behind the [`MetricsBackend`] trait so
//! the pipeline can run against the HTTP backend in production and the
//! in-memory backend in tests and local runs.

pub mod http;
pub mod memory;

pub use http::HttpMetricsBackend;
pub use memory::MemoryMetricsBackend;

use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Metric name for the availability signal
pub const METRIC_AVAILABILITY: &str = "url_availability";
/// Metric name for the latency measurement
pub const METRIC_LATENCY: &str = "url_latency";
/// Dimension name carrying the probed URL
pub const DIMENSION_URL: &str = "URL";

/// A key/value tag attached to a data point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Dimension name
    pub name: String,
    /// Dimension value
    pub value: String,
}

impl Dimension {
    /// Build a dimension from name/value pairs
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single numeric observation to publish.
///
/// The namespace is supplied per publish call, matching the backend API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDataPoint {
    /// Metric name
    pub metric_name: String,
    /// Ordered dimension set
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    /// Observed value
    pub value: f64,
    /// Unit of the value, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Statistic applied when aggregating data points over a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Statistic {
    /// Arithmetic mean over the period
    #[default]
    Average,
    /// Sum over the period
    Sum,
    /// Minimum over the period
    Minimum,
    /// Maximum over the period
    Maximum,
}

/// A lookback query for previously published data points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricQuery {
    /// Namespace to search
    pub namespace: String,
    /// Metric name to search
    pub metric_name: String,
    /// Dimensions that must all match
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    /// Aggregation granularity in seconds
    pub period_secs: u32,
    /// Statistic applied per period
    #[serde(default)]
    pub statistic: Statistic,
    /// Start of the lookback window
    pub start: DateTime<Utc>,
    /// End of the lookback window
    pub end: DateTime<Utc>,
    /// Upper bound on returned values
    pub max_datapoints: u32,
}

/// Time-series store consumed by the pipeline.
#[async_trait]
pub trait MetricsBackend: Send + Sync {
    /// Publish a batch of data points under a namespace. At-least-once,
    /// best-effort; no buffering or retry.
    async fn put_metric_data(&self, namespace: &str, data: &[MetricDataPoint]) -> Result<()>;

    /// Retrieve scalar values matching a query, ordered most recent first.
    async fn get_metric_data(&self, query: &MetricQuery) -> Result<Vec<f64>>;
}

/// Publishes individual measurements as metric data points.
#[derive(Clone)]
pub struct MetricEmitter {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricEmitter {
    /// Create an emitter over a backend.
    pub fn new(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Publish a single value. Each call is independent; a failed call is
    /// returned to the caller and the data point is lost.
    pub async fn publish(
        &self,
        namespace: &str,
        metric_name: &str,
        dimensions: &[Dimension],
        value: f64,
        unit: Option<&str>,
    ) -> Result<()> {
        let point = MetricDataPoint {
            metric_name: metric_name.to_string(),
            dimensions: dimensions.to_vec(),
            value,
            unit: unit.map(str::to_string),
        };
        self.backend.put_metric_data(namespace, &[point]).await
    }
}
