use aws_sdk_dynamodb::types::AttributeValue;

use crate::db::{StoreReply, VISIT_COUNT_ATTRIBUTE};
use crate::error::CounterError;

/// Pull the visit count out of a store reply.
///
/// Reads and updates wrap the record under different names (`Item` vs
/// `Attributes`), so every wrapper is scanned and the first record that
/// contains `visit_count` wins. Presence is what counts: a stored `0` is a
/// valid counter.
pub fn extract_visit_count(reply: &StoreReply) -> Result<u64, CounterError> {
    let value = reply
        .values()
        .find_map(|record| record.get(VISIT_COUNT_ATTRIBUTE))
        .ok_or(CounterError::CounterFieldMissing)?;

    coerce_counter(value)
}

fn coerce_counter(value: &AttributeValue) -> Result<u64, CounterError> {
    let raw = match value {
        AttributeValue::N(n) | AttributeValue::S(n) => n.trim(),
        other => return Err(CounterError::InvalidCounterValue(format!("{other:?}"))),
    };

    raw.parse::<u64>()
        .map_err(|_| CounterError::InvalidCounterValue(raw.to_string()))
}
