//! Push-model persistence
//!
//! Consumes a batch of notification envelopes and writes one record per
//! envelope. Batch processing is NOT atomic: a failed write stops the
//! invocation with `{status: "error"}` while earlier records in the batch
//! stay committed (at-most-once, partial-batch semantics). Callers that
//! need the whole batch must re-deliver it.

use super::record::HealthRecord;
use super::store::RecordStore;
use super::InvocationResult;
use crate::config::Config;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Field name used when an envelope body is stored as free text
pub const NOTIFICATION_FIELD: &str = "notification";

/// An inbound notification wrapper carrying an opaque message body
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// The message body: either a JSON-encoded object or free text
    pub message: String,
}

/// A batch of envelopes delivered by the notification transport
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationEvent {
    /// The delivered envelopes, in order
    pub records: Vec<Envelope>,
}

/// Persister that consumes inbound notification envelopes
pub struct PushPersister {
    store: Arc<dyn RecordStore>,
    table_name: String,
}

impl PushPersister {
    /// Build a persister from the pipeline configuration.
    pub fn new(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            table_name: config.persist.table_name.clone(),
        }
    }

    /// Persist one record per envelope in the event.
    ///
    /// An event without a `records` array yields an error result. A
    /// malformed message body never fails the batch by itself — it is
    /// stored under a single free-text field instead. A failed write stops
    /// the batch and yields an error result, with earlier writes committed.
    pub async fn persist_batch(&self, event: &Value) -> InvocationResult {
        let event: NotificationEvent = match serde_json::from_value(event.clone()) {
            Ok(event) => event,
            Err(e) => {
                warn!("Rejecting event without records: {}", e);
                return InvocationResult::error("no records in event");
            }
        };

        for envelope in &event.records {
            let record = record_from_message(&envelope.message);
            if let Err(e) = self.store.put_item(&self.table_name, &record).await {
                error!("Error writing record {}: {}", record.id, e);
                return InvocationResult::error(e.to_string());
            }
            info!("Wrote record {} to {}", record.id, self.table_name);
        }

        InvocationResult::success()
    }

    /// Persist a batch delivered in its wire form (a raw JSON string).
    ///
    /// Undecodable input is a persistence failure like any other: it is
    /// caught here and yields `{status: "error", reason}` instead of
    /// escaping the invocation boundary.
    pub async fn persist_batch_raw(&self, raw: &str) -> InvocationResult {
        match serde_json::from_str::<Value>(raw) {
            Ok(event) => self.persist_batch(&event).await,
            Err(e) => {
                warn!("Rejecting undecodable event: {}", e);
                InvocationResult::error(format!("invalid event JSON: {}", e))
            }
        }
    }
}

/// Build a record from an envelope body.
///
/// Only a JSON *object* counts as structured data; invalid JSON and
/// non-object JSON values both fall back to one free-text field.
fn record_from_message(message: &str) -> HealthRecord {
    match serde_json::from_str::<Value>(message) {
        Ok(Value::Object(fields)) => HealthRecord::with_fields(fields),
        _ => {
            let mut record = HealthRecord::new();
            record.set_text(NOTIFICATION_FIELD, message);
            record
        }
    }
}
