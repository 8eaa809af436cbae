use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::update_item::UpdateItemError,
    types::{AttributeValue, ReturnValue},
    Client,
};
use serde_dynamo::aws_sdk_dynamodb_1::to_item;

use crate::config::Config;

use super::{
    CounterStore, PageCounterRecord, Record, StoreError, StoreReply, ATTRIBUTES_WRAPPER,
    ITEM_WRAPPER, PAGE_ID_KEY, VISIT_COUNT_ATTRIBUTE,
};

/// DynamoDB-backed counter table for production use.
#[derive(Clone)]
pub struct DynamoDb {
    pub(crate) client: Client,
    pub table_name: String,
}

impl DynamoDb {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Load the SDK config from the environment, honoring a region override.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }
}

#[async_trait]
impl CounterStore for DynamoDb {
    async fn get_counter(&self, page_id: &str) -> Result<StoreReply, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PAGE_ID_KEY, AttributeValue::S(page_id.to_string()))
            .consistent_read(false)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let mut reply = StoreReply::new();
        if let Some(item) = output.item {
            reply.insert(ITEM_WRAPPER.to_string(), item);
        }
        Ok(reply)
    }

    /// Uses `UpdateItem` with `SET` plus an `attribute_exists` condition, so a
    /// missing page id fails instead of being created with a count of one.
    async fn increment_counter(&self, page_id: &str) -> Result<StoreReply, StoreError> {
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PAGE_ID_KEY, AttributeValue::S(page_id.to_string()))
            .update_expression("SET #count = #count + :inc")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#count", VISIT_COUNT_ATTRIBUTE)
            .expression_attribute_names("#pk", PAGE_ID_KEY)
            .expression_attribute_values(":inc", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| {
                if is_conditional_check_failed(&e) {
                    StoreError::ConditionFailed
                } else {
                    classify_sdk_error(e)
                }
            })?;

        let mut reply = StoreReply::new();
        if let Some(attributes) = output.attributes {
            reply.insert(ATTRIBUTES_WRAPPER.to_string(), attributes);
        }
        Ok(reply)
    }

    async fn put_counter(&self, record: &PageCounterRecord) -> Result<(), StoreError> {
        let item: Record = to_item(record).map_err(|e| StoreError::Validation {
            code: "SerializationError".to_string(),
            message: e.to_string(),
        })?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(())
    }
}

fn is_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            UpdateItemError::ConditionalCheckFailedException(_)
        ),
        _ => false,
    }
}

/// Split SDK failures into request validation errors and everything else.
///
/// The full error chain only goes to the debug log. Failures without service
/// metadata (timeouts, connection errors) get a fixed code and description so
/// endpoint details never reach the response body.
fn classify_sdk_error<E>(err: SdkError<E>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    tracing::debug!(error = %DisplayErrorContext(&err), "DynamoDB request failed");

    let (fallback_code, fallback_message) = transport_failure(&err);
    let code = err.code().unwrap_or(fallback_code).to_string();
    let message = err.message().unwrap_or(fallback_message).to_string();

    if code == "ValidationException" {
        StoreError::Validation { code, message }
    } else {
        StoreError::Communication { code, message }
    }
}

fn transport_failure<E>(err: &SdkError<E>) -> (&'static str, &'static str) {
    match err {
        SdkError::ConstructionFailure(_) => ("ConstructionFailure", "request could not be built"),
        SdkError::TimeoutError(_) => ("TimeoutError", "request timed out"),
        SdkError::DispatchFailure(_) => ("DispatchFailure", "request could not be sent"),
        SdkError::ResponseError(_) => ("ResponseError", "response could not be parsed"),
        _ => ("SdkError", "request failed"),
    }
}
