//! Key-value record stores

use super::record::HealthRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use redis::AsyncCommands;
use std::collections::HashMap;
use tracing::debug;

/// Key-value store consumed by the persisters.
///
/// `put_item` has unconditional overwrite-by-key semantics; the pipeline
/// never exercises the overwrite since record ids are always fresh.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write one record into a table.
    async fn put_item(&self, table: &str, item: &HealthRecord) -> Result<()>;
}

/// Record store backed by redis; items are stored as JSON strings under
/// `{table}:{id}`.
#[derive(Clone)]
pub struct RedisRecordStore {
    manager: redis::aio::ConnectionManager,
}

impl RedisRecordStore {
    /// Connect to a redis instance. The connection manager is
    /// process-lifetime-scoped and reconnects on its own; no teardown.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl RecordStore for RedisRecordStore {
    async fn put_item(&self, table: &str, item: &HealthRecord) -> Result<()> {
        let key = format!("{}:{}", table, item.id);
        let payload = serde_json::to_string(item)?;

        let mut conn = self.manager.clone();
        let _: () = conn.set(&key, payload).await?;
        debug!("Wrote record {} to {}", item.id, table);
        Ok(())
    }
}

/// In-memory record store for tests and local runs
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: RwLock<HashMap<String, Vec<HealthRecord>>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records written to a table, in write order.
    pub fn items(&self, table: &str) -> Vec<HealthRecord> {
        self.tables.read().get(table).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put_item(&self, table: &str, item: &HealthRecord) -> Result<()> {
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(item.clone());
        Ok(())
    }
}
