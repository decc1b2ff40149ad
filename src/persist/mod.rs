//! Persistence of sampled health results
//!
//! Two contracts write [`HealthRecord`]s into the key-value store: the pull
//! model ([`pull::PullPersister`]) reads the latest data points back from
//! the metrics backend, and the push model ([`push::PushPersister`])
//! consumes inbound notification envelopes. Push is the production default;
//! the configuration selects the mode.

pub mod pull;
pub mod push;
pub mod record;
pub mod store;

pub use pull::PullPersister;
pub use push::{Envelope, NotificationEvent, PushPersister};
pub use record::HealthRecord;
pub use store::{MemoryRecordStore, RecordStore, RedisRecordStore};

use serde::Serialize;

/// Structured result of one persistence invocation.
///
/// Persisters never panic or propagate errors past this boundary; every
/// failure becomes an `{status: "error", reason}` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InvocationResult {
    /// The invocation completed; pull-model invocations carry the written
    /// record.
    Success {
        /// The persisted record, when the contract returns one
        #[serde(skip_serializing_if = "Option::is_none")]
        item: Option<HealthRecord>,
    },
    /// The invocation failed; earlier writes in a batch may already be
    /// committed.
    Error {
        /// Human-readable failure reason
        reason: String,
    },
}

impl InvocationResult {
    /// A bare success.
    pub fn success() -> Self {
        Self::Success { item: None }
    }

    /// A success carrying the written record.
    pub fn success_with_item(item: HealthRecord) -> Self {
        Self::Success { item: Some(item) }
    }

    /// A failure with a reason.
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error {
            reason: reason.into(),
        }
    }

    /// Whether the invocation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
