//! End-to-end persistence behavior over the in-memory backends

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webcanary::config::Config;
use webcanary::handler::ProbeHandler;
use webcanary::metrics::MemoryMetricsBackend;
use webcanary::persist::{MemoryRecordStore, PullPersister, PushPersister};

fn pipeline_config(url: &str) -> Config {
    let mut config = Config::default();
    config.probe.url = url.to_string();
    config.metrics.namespace = "PersistTest".to_string();
    config.persist.table_name = "PersistTable".to_string();
    config
}

#[tokio::test]
async fn probe_then_pull_persists_measured_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = pipeline_config(&server.uri());
    let backend = Arc::new(MemoryMetricsBackend::new());
    let store = Arc::new(MemoryRecordStore::new());

    // Probe cycle publishes both metrics
    let handler = ProbeHandler::new(&config, backend.clone()).unwrap();
    handler.run().await;

    // A separately triggered pull invocation reads them back
    let persister = PullPersister::new(&config, backend, store.clone());
    let result = persister.persist_latest().await;

    assert!(result.is_success());
    let items = store.items("PersistTable");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].fields["availability"], 1.0);
    assert!(items[0].fields["latency"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn pull_with_no_published_data_writes_bare_record() {
    let config = pipeline_config("www.example.org");
    let backend = Arc::new(MemoryMetricsBackend::new());
    let store = Arc::new(MemoryRecordStore::new());

    let persister = PullPersister::new(&config, backend, store.clone());
    let result = persister.persist_latest().await;

    // No data in the lookback window: the record is written with its id
    // only; nothing is coerced to zero.
    assert!(result.is_success());
    let items = store.items("PersistTable");
    assert_eq!(items.len(), 1);
    assert!(!items[0].id.is_empty());
    assert!(items[0].fields.is_empty());
}

#[tokio::test]
async fn repeated_invocations_write_records_with_distinct_ids() {
    let config = pipeline_config("www.example.org");
    let store = Arc::new(MemoryRecordStore::new());
    let persister = PushPersister::new(&config, store.clone());

    let event = serde_json::json!({"records": [{"message": "{\"availability\": 1}"}]});
    for _ in 0..3 {
        assert!(persister.persist_batch(&event).await.is_success());
    }

    let items = store.items("PersistTable");
    assert_eq!(items.len(), 3);
    assert_ne!(items[0].id, items[1].id);
    assert_ne!(items[1].id, items[2].id);
    assert_ne!(items[0].id, items[2].id);
}

#[tokio::test]
async fn push_batch_mixes_structured_and_free_text_bodies() {
    let config = pipeline_config("www.example.org");
    let store = Arc::new(MemoryRecordStore::new());
    let persister = PushPersister::new(&config, store.clone());

    let event = serde_json::json!({
        "records": [
            {"message": "{\"availability\": 0, \"latency\": 0.0}"},
            {"message": "ALARM \"url_availability\" in breach"},
        ]
    });

    let result = persister.persist_batch(&event).await;

    assert!(result.is_success());
    let items = store.items("PersistTable");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].fields["availability"], 0);
    assert_eq!(
        items[1].fields["notification"],
        "ALARM \"url_availability\" in breach"
    );
}
