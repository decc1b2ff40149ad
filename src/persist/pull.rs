//! Pull-model persistence
//!
//! Queries the metrics backend for the single most recent data point per
//! metric within the lookback window and writes the values as one record.
//! A metric with no data point in the window yields no field in the record;
//! absence is never coerced to zero. (The prober's own fail-soft policy
//! coerces *its* failures to zero; the asymmetry is deliberate — "the
//! backend has no data" is not the same observation as "the probe failed".)

use super::record::HealthRecord;
use super::store::RecordStore;
use super::InvocationResult;
use crate::config::Config;
use crate::metrics::{
    Dimension, MetricQuery, MetricsBackend, Statistic, DIMENSION_URL, METRIC_AVAILABILITY,
    METRIC_LATENCY,
};
use crate::utils::error::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Persister that reads the latest metric values back from the backend
pub struct PullPersister {
    backend: Arc<dyn MetricsBackend>,
    store: Arc<dyn RecordStore>,
    namespace: String,
    url: String,
    table_name: String,
    lookback: Duration,
    period_secs: u32,
}

impl PullPersister {
    /// Build a persister from the pipeline configuration.
    pub fn new(
        config: &Config,
        backend: Arc<dyn MetricsBackend>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            backend,
            store,
            namespace: config.metrics.namespace.clone(),
            url: config.probe.url.clone(),
            table_name: config.persist.table_name.clone(),
            lookback: Duration::minutes(i64::from(config.persist.lookback_minutes)),
            period_secs: config.persist.period_secs,
        }
    }

    /// Persist the most recent latency/availability values as one record.
    ///
    /// Never propagates an error past this boundary: backend query failures
    /// and store write failures both become `{status: "error", reason}`.
    pub async fn persist_latest(&self) -> InvocationResult {
        match self.try_persist().await {
            Ok(record) => InvocationResult::success_with_item(record),
            Err(e) => {
                error!("Error persisting latest metrics: {}", e);
                InvocationResult::error(e.to_string())
            }
        }
    }

    async fn try_persist(&self) -> Result<HealthRecord> {
        let latency = self.latest_metric(METRIC_LATENCY).await?;
        let availability = self.latest_metric(METRIC_AVAILABILITY).await?;

        let mut record = HealthRecord::new();
        if let Some(value) = latency {
            record.set_number("latency", value);
        }
        if let Some(value) = availability {
            record.set_number("availability", value);
        }

        self.store.put_item(&self.table_name, &record).await?;
        info!("Wrote record {} to {}", record.id, self.table_name);
        Ok(record)
    }

    /// The single most recent value for a metric within the lookback
    /// window, or `None` if no data point exists there.
    async fn latest_metric(&self, metric_name: &str) -> Result<Option<f64>> {
        let end = Utc::now();
        let query = MetricQuery {
            namespace: self.namespace.clone(),
            metric_name: metric_name.to_string(),
            dimensions: vec![Dimension::new(DIMENSION_URL, &self.url)],
            period_secs: self.period_secs,
            statistic: Statistic::Average,
            start: end - self.lookback,
            end,
            max_datapoints: 1,
        };

        let values = self.backend.get_metric_data(&query).await?;
        Ok(values.first().copied())
    }
}
