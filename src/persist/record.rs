//! Durable health records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single persisted health observation.
///
/// The `id` is the primary key, generated at write time by the persister —
/// never by the caller — and globally unique. Records are immutable after
/// the write; no update or delete path exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Freshly generated UUID primary key
    pub id: String,
    /// Arbitrary additional fields (measured values, notification payloads)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl HealthRecord {
    /// Create an empty record with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fields: Map::new(),
        }
    }

    /// Create a record with a fresh id and the given fields. Any
    /// caller-supplied `id` field is discarded.
    pub fn with_fields(mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        let mut record = Self::new();
        record.fields = fields;
        record
    }

    /// Set a numeric field.
    pub fn set_number(&mut self, name: &str, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.fields.insert(name.to_string(), Value::Number(number));
        }
    }

    /// Set a text field.
    pub fn set_text(&mut self, name: &str, value: &str) {
        self.fields
            .insert(name.to_string(), Value::String(value.to_string()));
    }
}

impl Default for HealthRecord {
    fn default() -> Self {
        Self::new()
    }
}
