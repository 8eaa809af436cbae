use lambda_http::http::StatusCode;

use crate::db::CounterStore;
use crate::dispatch::Operation;
use crate::error::CounterError;
use crate::extract::extract_visit_count;

/// Normalized outcome of a counter operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub status_code: StatusCode,
    pub body: String,
}

impl OperationResult {
    pub fn ok(visit_count: u64) -> Self {
        Self {
            status_code: StatusCode::OK,
            body: visit_count.to_string(),
        }
    }
}

impl From<&CounterError> for OperationResult {
    fn from(err: &CounterError) -> Self {
        Self {
            status_code: err.status_code(),
            body: err.body(),
        }
    }
}

/// Read the counter for `page_id` without touching it.
pub async fn get_visitor_count(
    db: &dyn CounterStore,
    page_id: &str,
) -> Result<u64, CounterError> {
    let reply = db.get_counter(page_id).await?;
    tracing::debug!(page_id, ?reply, "get_counter reply");

    if reply.is_empty() {
        return Err(CounterError::RecordNotFound);
    }
    extract_visit_count(&reply)
}

/// Add one to the counter for `page_id` and return the new value.
///
/// Fails with [`CounterError::RecordNotFound`] when the page has no record.
pub async fn add_one_visitor_count(
    db: &dyn CounterStore,
    page_id: &str,
) -> Result<u64, CounterError> {
    let reply = db.increment_counter(page_id).await?;
    tracing::debug!(page_id, ?reply, "increment_counter reply");

    extract_visit_count(&reply)
}

/// Run a dispatched operation against the store.
pub async fn execute(db: &dyn CounterStore, operation: &Operation) -> Result<u64, CounterError> {
    match operation {
        Operation::GetVisitorCount { page_id } => get_visitor_count(db, page_id).await,
        Operation::AddOneVisitorCount { page_id } => add_one_visitor_count(db, page_id).await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use aws_sdk_dynamodb::types::AttributeValue;

    use super::*;
    use crate::db::{MemoryDb, PageCounterRecord, Record, PAGE_ID_KEY};

    const PAGE_ID: &str = "12345678-1234-5678-1234-56781234";
    const MISSING_PAGE_ID: &str = "NOTVALID-1234-5678-1234-56781234";

    async fn seeded(visit_count: u64) -> MemoryDb {
        let db = MemoryDb::new();
        db.put_counter(&PageCounterRecord {
            pkey_uuid: PAGE_ID.to_string(),
            visit_count,
        })
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_get_visitor_count() {
        let db = seeded(42).await;
        assert_eq!(get_visitor_count(&db, PAGE_ID).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_get_visitor_count_missing_page() {
        let db = seeded(42).await;
        let err = get_visitor_count(&db, MISSING_PAGE_ID).await.unwrap_err();
        assert!(matches!(err, CounterError::RecordNotFound));

        let result = OperationResult::from(&err);
        assert_eq!(result.status_code, StatusCode::NOT_FOUND);
        assert!(result.body.to_lowercase().contains("not found"));
    }

    #[tokio::test]
    async fn test_get_visitor_count_is_repeatable() {
        let db = seeded(9).await;
        for _ in 0..3 {
            assert_eq!(get_visitor_count(&db, PAGE_ID).await.unwrap(), 9);
        }
    }

    #[tokio::test]
    async fn test_get_zero_count() {
        let db = seeded(0).await;
        assert_eq!(get_visitor_count(&db, PAGE_ID).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_record_without_counter_is_not_found() {
        let db = MemoryDb::new();
        db.insert_record(
            PAGE_ID,
            Record::from([(
                PAGE_ID_KEY.to_string(),
                AttributeValue::S(PAGE_ID.to_string()),
            )]),
        )
        .unwrap();

        let err = get_visitor_count(&db, PAGE_ID).await.unwrap_err();
        assert!(matches!(err, CounterError::CounterFieldMissing));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_one_visitor_count() {
        let db = seeded(42).await;
        assert_eq!(add_one_visitor_count(&db, PAGE_ID).await.unwrap(), 43);
        assert_eq!(get_visitor_count(&db, PAGE_ID).await.unwrap(), 43);
    }

    #[tokio::test]
    async fn test_add_one_visitor_count_missing_page() {
        let db = seeded(42).await;
        let err = add_one_visitor_count(&db, MISSING_PAGE_ID).await.unwrap_err();
        assert!(matches!(err, CounterError::RecordNotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        assert!(matches!(
            get_visitor_count(&db, MISSING_PAGE_ID).await.unwrap_err(),
            CounterError::RecordNotFound
        ));
    }

    #[tokio::test]
    async fn test_add_one_without_counter_is_validation_404() {
        let db = MemoryDb::new();
        db.insert_record(
            PAGE_ID,
            Record::from([(
                PAGE_ID_KEY.to_string(),
                AttributeValue::S(PAGE_ID.to_string()),
            )]),
        )
        .unwrap();

        let err = add_one_visitor_count(&db, PAGE_ID).await.unwrap_err();
        assert!(matches!(err, CounterError::StoreValidation { .. }));
        assert_eq!(OperationResult::from(&err).status_code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sequential_increments_are_distinct_and_complete() {
        const START: u64 = 100;
        const N: u64 = 25;

        let db = seeded(START).await;
        let mut seen = HashSet::new();
        for _ in 0..N {
            let value = add_one_visitor_count(&db, PAGE_ID).await.unwrap();
            assert!((START + 1..=START + N).contains(&value));
            assert!(seen.insert(value), "duplicate value {value}");
        }

        assert_eq!(seen.len() as u64, N);
        assert_eq!(get_visitor_count(&db, PAGE_ID).await.unwrap(), START + N);
    }

    #[tokio::test]
    async fn test_execute_routes_operations() {
        let db = seeded(1).await;
        let page_id = PAGE_ID.to_string();

        let get = Operation::GetVisitorCount {
            page_id: page_id.clone(),
        };
        let add = Operation::AddOneVisitorCount { page_id };

        assert_eq!(execute(&db, &get).await.unwrap(), 1);
        assert_eq!(execute(&db, &add).await.unwrap(), 2);
        assert_eq!(execute(&db, &get).await.unwrap(), 2);
    }
}
