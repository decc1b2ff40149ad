//! Probe and metric-emission behavior against a mock HTTP server

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webcanary::config::Config;
use webcanary::handler::ProbeHandler;
use webcanary::metrics::{
    HttpMetricsBackend, MemoryMetricsBackend, MetricsBackend, DIMENSION_URL, METRIC_AVAILABILITY,
    METRIC_LATENCY,
};
use webcanary::probe::Prober;

async fn server_responding(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn probe_of_healthy_url_measures_availability_and_latency() {
    let server = server_responding(200).await;
    let prober = Prober::with_timeout(Duration::from_secs(5)).unwrap();

    let sample = prober.check(&server.uri()).await;

    assert_eq!(sample.availability, 1);
    assert!(sample.latency > 0.0);
    assert!(sample.is_available());
}

#[tokio::test]
async fn probe_of_erroring_url_measures_latency_but_not_availability() {
    // The connection succeeds, so this is not a zero sample: latency is
    // the measured elapsed time even though availability is 0.
    let server = server_responding(500).await;
    let prober = Prober::with_timeout(Duration::from_secs(5)).unwrap();

    let sample = prober.check(&server.uri()).await;

    assert_eq!(sample.availability, 0);
    assert!(sample.latency > 0.0);
}

#[tokio::test]
async fn probe_timeout_yields_zero_sample() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let prober = Prober::with_timeout(Duration::from_millis(250)).unwrap();
    let sample = prober.check(&server.uri()).await;

    assert_eq!(sample.availability, 0);
    assert_eq!(sample.latency, 0.0);
}

#[tokio::test]
async fn probe_cycle_publishes_each_metric_exactly_once() {
    let server = server_responding(200).await;

    let mut config = Config::default();
    config.probe.url = server.uri();
    config.metrics.namespace = "PipelineTest".to_string();

    let backend = Arc::new(MemoryMetricsBackend::new());
    let handler = ProbeHandler::new(&config, backend.clone()).unwrap();

    let report = handler.run().await;

    assert_eq!(report.availability, 1);
    assert_eq!(backend.point_count("PipelineTest", METRIC_AVAILABILITY), 1);
    assert_eq!(backend.point_count("PipelineTest", METRIC_LATENCY), 1);

    // Every data point is tagged with the probed URL
    let dimensions = backend
        .last_dimensions("PipelineTest", METRIC_LATENCY)
        .unwrap();
    assert!(dimensions
        .iter()
        .any(|d| d.name == DIMENSION_URL && d.value == server.uri()));
}

#[tokio::test]
async fn http_backend_publishes_namespace_and_points() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/metrics"))
        .and(body_partial_json(serde_json::json!({
            "namespace": "BackendTest",
            "metric_data": [{"metric_name": "url_availability", "value": 1.0}]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpMetricsBackend::new(server.uri());
    let point = webcanary::MetricDataPoint {
        metric_name: METRIC_AVAILABILITY.to_string(),
        dimensions: vec![],
        value: 1.0,
        unit: None,
    };

    backend
        .put_metric_data("BackendTest", &[point])
        .await
        .unwrap();
}

#[tokio::test]
async fn http_backend_surfaces_rejected_publishes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/metrics"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = HttpMetricsBackend::new(server.uri());
    let point = webcanary::MetricDataPoint {
        metric_name: METRIC_LATENCY.to_string(),
        dimensions: vec![],
        value: 0.5,
        unit: Some("Seconds".to_string()),
    };

    let result = backend.put_metric_data("BackendTest", &[point]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn http_backend_parses_query_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/metrics/query"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"values": [0.4, 0.1]})),
        )
        .mount(&server)
        .await;

    let backend = HttpMetricsBackend::new(server.uri());
    let now = chrono::Utc::now();
    let query = webcanary::metrics::MetricQuery {
        namespace: "BackendTest".to_string(),
        metric_name: METRIC_LATENCY.to_string(),
        dimensions: vec![],
        period_secs: 60,
        statistic: webcanary::metrics::Statistic::Average,
        start: now - chrono::Duration::minutes(5),
        end: now,
        max_datapoints: 1,
    };

    let values = backend.get_metric_data(&query).await.unwrap();
    assert_eq!(values, vec![0.4, 0.1]);
}
