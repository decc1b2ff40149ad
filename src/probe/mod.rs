//! URL probing
//!
//! A probe is one outbound GET against the target URL. Both measured values
//! (availability and latency) are derived from the same request, so a probe
//! cycle can never report a latency for a request that was judged
//! unavailable by a different request.

use crate::config::ProbeConfig;
use crate::utils::error::Result;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// The outcome of a single probe cycle.
///
/// Ephemeral: produced once per cycle and handed to the metric emitter,
/// never retained by the prober.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSample {
    /// 1 if the target answered HTTP 200 within the timeout, else 0
    pub availability: u8,
    /// Elapsed wall-clock seconds for the request; 0.0 when the request
    /// never completed (timeout, DNS failure, connection refused)
    pub latency: f64,
    /// The probed URL as configured
    pub url: String,
}

impl HealthSample {
    /// Whether the target counted as available this cycle
    pub fn is_available(&self) -> bool {
        self.availability == 1
    }
}

/// Issues health-check requests against a target URL.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    /// Create a prober with the configured per-request timeout.
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        Self::with_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Create a prober with an explicit per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Probe a URL once.
    ///
    /// Fails soft: any transport error yields `availability = 0` and
    /// `latency = 0.0`. A response with a non-200 status is the boundary
    /// case where the connection succeeded, so latency is the measured
    /// elapsed time while availability is still 0.
    pub async fn check(&self, url: &str) -> HealthSample {
        let target = normalize_url(url);
        debug!("Probing {}", target);

        let start = Instant::now();
        match self.client.get(&target).send().await {
            Ok(response) => {
                let latency = start.elapsed().as_secs_f64();
                let availability = u8::from(response.status() == reqwest::StatusCode::OK);
                HealthSample {
                    availability,
                    latency,
                    url: url.to_string(),
                }
            }
            Err(e) => {
                warn!("Error probing {}: {}", target, e);
                HealthSample {
                    availability: 0,
                    latency: 0.0,
                    url: url.to_string(),
                }
            }
        }
    }
}

/// Bare host/path targets are probed over HTTPS.
fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
