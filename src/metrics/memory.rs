//! In-process metrics backend for tests and local runs

use super::{Dimension, MetricDataPoint, MetricQuery, MetricsBackend};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

#[derive(Debug, Clone)]
struct StoredPoint {
    namespace: String,
    point: MetricDataPoint,
    timestamp: DateTime<Utc>,
}

/// Metrics backend holding all published data points in memory
#[derive(Debug, Default)]
pub struct MemoryMetricsBackend {
    points: RwLock<Vec<StoredPoint>>,
}

impl MemoryMetricsBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a data point with an explicit timestamp. Lets tests place
    /// points outside a lookback window.
    pub fn insert_at(&self, namespace: &str, point: MetricDataPoint, timestamp: DateTime<Utc>) {
        self.points.write().push(StoredPoint {
            namespace: namespace.to_string(),
            point,
            timestamp,
        });
    }

    /// Number of stored points for a namespace/metric pair.
    pub fn point_count(&self, namespace: &str, metric_name: &str) -> usize {
        self.points
            .read()
            .iter()
            .filter(|p| p.namespace == namespace && p.point.metric_name == metric_name)
            .count()
    }

    /// Dimensions of the most recently stored point for a metric, if any.
    pub fn last_dimensions(&self, namespace: &str, metric_name: &str) -> Option<Vec<Dimension>> {
        self.points
            .read()
            .iter()
            .rev()
            .find(|p| p.namespace == namespace && p.point.metric_name == metric_name)
            .map(|p| p.point.dimensions.clone())
    }
}

#[async_trait]
impl MetricsBackend for MemoryMetricsBackend {
    async fn put_metric_data(&self, namespace: &str, data: &[MetricDataPoint]) -> Result<()> {
        let now = Utc::now();
        let mut points = self.points.write();
        for point in data {
            points.push(StoredPoint {
                namespace: namespace.to_string(),
                point: point.clone(),
                timestamp: now,
            });
        }
        Ok(())
    }

    async fn get_metric_data(&self, query: &MetricQuery) -> Result<Vec<f64>> {
        let points = self.points.read();
        let mut matches: Vec<&StoredPoint> = points
            .iter()
            .filter(|p| {
                p.namespace == query.namespace
                    && p.point.metric_name == query.metric_name
                    && p.timestamp >= query.start
                    && p.timestamp <= query.end
                    && query
                        .dimensions
                        .iter()
                        .all(|d| p.point.dimensions.contains(d))
            })
            .collect();

        // Most recent first
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches.truncate(query.max_datapoints as usize);

        Ok(matches.iter().map(|p| p.point.value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{DIMENSION_URL, METRIC_LATENCY, Statistic};
    use chrono::Duration;

    fn latency_point(value: f64) -> MetricDataPoint {
        MetricDataPoint {
            metric_name: METRIC_LATENCY.to_string(),
            dimensions: vec![Dimension::new(DIMENSION_URL, "example.org")],
            value,
            unit: Some("Seconds".to_string()),
        }
    }

    fn lookback_query(minutes: i64) -> MetricQuery {
        let now = Utc::now();
        MetricQuery {
            namespace: "Test".to_string(),
            metric_name: METRIC_LATENCY.to_string(),
            dimensions: vec![Dimension::new(DIMENSION_URL, "example.org")],
            period_secs: 60,
            statistic: Statistic::Average,
            start: now - Duration::minutes(minutes),
            end: now,
            max_datapoints: 1,
        }
    }

    #[tokio::test]
    async fn test_newest_first_and_truncated() {
        let backend = MemoryMetricsBackend::new();
        let now = Utc::now();
        backend.insert_at("Test", latency_point(0.1), now - Duration::minutes(3));
        backend.insert_at("Test", latency_point(0.4), now - Duration::minutes(1));

        let values = backend.get_metric_data(&lookback_query(5)).await.unwrap();
        assert_eq!(values, vec![0.4]);
    }

    #[tokio::test]
    async fn test_points_outside_window_excluded() {
        let backend = MemoryMetricsBackend::new();
        let now = Utc::now();
        backend.insert_at("Test", latency_point(0.1), now - Duration::minutes(30));

        let values = backend.get_metric_data(&lookback_query(5)).await.unwrap();
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn test_dimensions_must_match() {
        let backend = MemoryMetricsBackend::new();
        let mut point = latency_point(0.2);
        point.dimensions = vec![Dimension::new(DIMENSION_URL, "other.org")];
        backend.insert_at("Test", point, Utc::now());

        let values = backend.get_metric_data(&lookback_query(5)).await.unwrap();
        assert!(values.is_empty());
    }
}
