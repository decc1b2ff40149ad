//! JSON-over-HTTP metrics backend
//!
//! Talks to a metrics service exposing two endpoints:
//! `POST {base}/api/v1/metrics` to publish and
//! `POST {base}/api/v1/metrics/query` to read back.

use super::{MetricDataPoint, MetricQuery, MetricsBackend};
use crate::utils::error::{CanaryError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Shared across invocations; reqwest clients pool connections internally
// and need no teardown.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Serialize)]
struct PutMetricDataRequest<'a> {
    namespace: &'a str,
    metric_data: &'a [MetricDataPoint],
}

#[derive(Deserialize)]
struct GetMetricDataResponse {
    values: Vec<f64>,
}

/// Metrics backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpMetricsBackend {
    base_url: String,
}

impl HttpMetricsBackend {
    /// Create a backend against a base endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let mut base_url = endpoint.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = HTTP_CLIENT.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CanaryError::Metrics(format!(
                "Backend returned {} for {}",
                status, url
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl MetricsBackend for HttpMetricsBackend {
    async fn put_metric_data(&self, namespace: &str, data: &[MetricDataPoint]) -> Result<()> {
        debug!(
            "Publishing {} data point(s) to namespace {}",
            data.len(),
            namespace
        );
        let body = PutMetricDataRequest {
            namespace,
            metric_data: data,
        };
        self.post_json("/api/v1/metrics", &body).await?;
        Ok(())
    }

    async fn get_metric_data(&self, query: &MetricQuery) -> Result<Vec<f64>> {
        debug!(
            "Querying {}/{} back to {}",
            query.namespace, query.metric_name, query.start
        );
        let response = self.post_json("/api/v1/metrics/query", query).await?;
        let parsed: GetMetricDataResponse = response
            .json()
            .await
            .map_err(|e| CanaryError::Metrics(format!("Failed to parse query response: {}", e)))?;
        Ok(parsed.values)
    }
}
