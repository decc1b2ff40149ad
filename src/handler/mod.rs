//! Single-shot invocation entry points
//!
//! Each handler is one stateless invocation: the external scheduler
//! provides periodicity, the handler runs to completion (or to the probe
//! timeout) and returns a structured value.

use crate::config::Config;
use crate::metrics::{
    Dimension, MetricEmitter, MetricsBackend, DIMENSION_URL, METRIC_AVAILABILITY, METRIC_LATENCY,
};
use crate::probe::Prober;
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// The values measured by one probe invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    /// 1 if the target answered HTTP 200 within the timeout, else 0
    pub availability: u8,
    /// Elapsed seconds for the request, 0.0 if it never completed
    pub latency: f64,
}

/// Probes the configured URL and emits both measurements.
pub struct ProbeHandler {
    prober: Prober,
    emitter: MetricEmitter,
    namespace: String,
    url: String,
}

impl ProbeHandler {
    /// Build a handler from the pipeline configuration.
    pub fn new(config: &Config, backend: Arc<dyn MetricsBackend>) -> Result<Self> {
        Ok(Self {
            prober: Prober::new(&config.probe)?,
            emitter: MetricEmitter::new(backend),
            namespace: config.metrics.namespace.clone(),
            url: config.probe.url.clone(),
        })
    }

    /// Run one probe cycle: check the URL, publish availability and
    /// latency exactly once each, tagged with the probed URL.
    ///
    /// A failed publish loses that data point and nothing else: the error
    /// is logged and the cycle still returns its report.
    pub async fn run(&self) -> ProbeReport {
        let sample = self.prober.check(&self.url).await;
        info!(
            "Probe of {}: availability={} latency={:.3}s",
            sample.url, sample.availability, sample.latency
        );

        let dimensions = [Dimension::new(DIMENSION_URL, &self.url)];

        if let Err(e) = self
            .emitter
            .publish(
                &self.namespace,
                METRIC_AVAILABILITY,
                &dimensions,
                f64::from(sample.availability),
                None,
            )
            .await
        {
            warn!("Error publishing {}: {}", METRIC_AVAILABILITY, e);
        }

        if let Err(e) = self
            .emitter
            .publish(
                &self.namespace,
                METRIC_LATENCY,
                &dimensions,
                sample.latency,
                Some("Seconds"),
            )
            .await
        {
            warn!("Error publishing {}: {}", METRIC_LATENCY, e);
        }

        ProbeReport {
            availability: sample.availability,
            latency: sample.latency,
        }
    }
}
