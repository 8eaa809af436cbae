pub mod dynamo;
pub mod memory;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub use self::dynamo::DynamoDb;
pub use self::memory::MemoryDb;

/// Partition key of the counter table.
pub const PAGE_ID_KEY: &str = "pkey_uuid";
/// Attribute holding the visit count.
pub const VISIT_COUNT_ATTRIBUTE: &str = "visit_count";

/// Wrapper under which `GetItem` returns the record.
pub const ITEM_WRAPPER: &str = "Item";
/// Wrapper under which `UpdateItem` returns the updated attributes.
pub const ATTRIBUTES_WRAPPER: &str = "Attributes";

/// A DynamoDB item, or the subset of one returned by an update.
pub type Record = HashMap<String, AttributeValue>;

/// Raw store reply, keyed by wrapper name.
///
/// Reads and updates nest the record under different wrappers, so consumers
/// should scan the entries instead of looking up a fixed name. An empty reply
/// means the store found no record.
pub type StoreReply = BTreeMap<String, Record>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCounterRecord {
    pub pkey_uuid: String,
    pub visit_count: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The conditional write found no record for the key.
    #[error("conditional check failed: no record for the page id")]
    ConditionFailed,
    /// The store rejected the request itself, e.g. a missing attribute path.
    #[error("{code}: {message}")]
    Validation { code: String, message: String },
    #[error("{code}: {message}")]
    Communication { code: String, message: String },
}

/// Storage backend for page counters.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Eventually consistent point read of the record for `page_id`.
    async fn get_counter(&self, page_id: &str) -> Result<StoreReply, StoreError>;

    /// Atomically add one to `visit_count` of an existing record and return
    /// the updated attributes. Must not create a missing record.
    async fn increment_counter(&self, page_id: &str) -> Result<StoreReply, StoreError>;

    /// Write a counter record unconditionally. Never called by the handler.
    async fn put_counter(&self, record: &PageCounterRecord) -> Result<(), StoreError>;
}

/// Create a DynamoDB-backed store for the configured table.
pub async fn dynamo(config: &Config) -> Arc<dyn CounterStore> {
    Arc::new(DynamoDb::from_config(config).await)
}

/// Create an in-memory store for local development and testing.
pub fn memory() -> Arc<dyn CounterStore> {
    Arc::new(MemoryDb::new())
}
