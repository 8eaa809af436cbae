use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_dynamo::aws_sdk_dynamodb_1::to_item;

use super::{
    CounterStore, PageCounterRecord, Record, StoreError, StoreReply, ATTRIBUTES_WRAPPER,
    ITEM_WRAPPER, VISIT_COUNT_ATTRIBUTE,
};

/// In-memory counter table for local development and testing.
///
/// Replies use the same wrapper names and error codes as DynamoDB. A single
/// write lock covers each increment, which makes it atomic.
#[derive(Clone, Default)]
pub struct MemoryDb {
    records: Arc<RwLock<HashMap<String, Record>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an arbitrary item under `page_id`, e.g. one without a counter.
    pub fn insert_record(&self, page_id: &str, record: Record) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.insert(page_id.to_string(), record);
        Ok(())
    }

    /// Number of stored records. Lets callers check that a failed increment
    /// created nothing.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().map_err(lock_error)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Communication {
        code: "LockPoisoned".to_string(),
        message: format!("Lock error: {e}"),
    }
}

fn validation(message: &str) -> StoreError {
    StoreError::Validation {
        code: "ValidationException".to_string(),
        message: message.to_string(),
    }
}

fn check_key(page_id: &str) -> Result<(), StoreError> {
    if page_id.is_empty() {
        return Err(validation(
            "One or more parameter values are not valid. The AttributeValue for a key attribute cannot contain an empty string value.",
        ));
    }
    Ok(())
}

#[async_trait]
impl CounterStore for MemoryDb {
    async fn get_counter(&self, page_id: &str) -> Result<StoreReply, StoreError> {
        check_key(page_id)?;

        let records = self.records.read().map_err(lock_error)?;
        let mut reply = StoreReply::new();
        if let Some(record) = records.get(page_id) {
            reply.insert(ITEM_WRAPPER.to_string(), record.clone());
        }
        Ok(reply)
    }

    async fn increment_counter(&self, page_id: &str) -> Result<StoreReply, StoreError> {
        check_key(page_id)?;

        let mut records = self.records.write().map_err(lock_error)?;
        let record = records
            .get_mut(page_id)
            .ok_or(StoreError::ConditionFailed)?;

        let current = match record.get(VISIT_COUNT_ATTRIBUTE) {
            Some(AttributeValue::N(n)) => n.parse::<u64>().map_err(|_| {
                validation("An operand in the update expression has an incorrect data type")
            })?,
            Some(_) => {
                return Err(validation(
                    "An operand in the update expression has an incorrect data type",
                ))
            }
            None => {
                return Err(validation(
                    "The provided expression refers to an attribute that does not exist in the item",
                ))
            }
        };

        let updated = current.checked_add(1).ok_or_else(|| {
            validation("Number overflow. Attempting to store a number with magnitude larger than supported range")
        })?;
        let value = AttributeValue::N(updated.to_string());
        record.insert(VISIT_COUNT_ATTRIBUTE.to_string(), value.clone());

        let attributes = Record::from([(VISIT_COUNT_ATTRIBUTE.to_string(), value)]);
        Ok(StoreReply::from([(ATTRIBUTES_WRAPPER.to_string(), attributes)]))
    }

    async fn put_counter(&self, record: &PageCounterRecord) -> Result<(), StoreError> {
        check_key(&record.pkey_uuid)?;

        let item: Record = to_item(record).map_err(|e| StoreError::Validation {
            code: "SerializationError".to_string(),
            message: e.to_string(),
        })?;
        self.insert_record(&record.pkey_uuid, item)
    }
}
