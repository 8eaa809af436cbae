use lambda_http::http::StatusCode;
use thiserror::Error;

use crate::db::StoreError;

/// Everything that can go wrong while serving a counter request.
///
/// Each variant maps to an HTTP status code through [`CounterError::status_code`].
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("Requested path or parameter not found")]
    RequestNotRecognized,
    #[error("page id has no counter")]
    RecordNotFound,
    #[error(
        "\"visit_count\" attribute is expected but not found in the database response. Check again the page-id."
    )]
    CounterFieldMissing,
    #[error("\"visit_count\" holds a value that is not a counter: {0}")]
    InvalidCounterValue(String),
    #[error("the provided attribute or partition key item is not found in DynamoDB.")]
    StoreValidation { code: String, message: String },
    #[error("{code}: {message}")]
    StoreCommunication { code: String, message: String },
}

impl CounterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CounterError::RequestNotRecognized
            | CounterError::RecordNotFound
            | CounterError::CounterFieldMissing
            | CounterError::InvalidCounterValue(_)
            | CounterError::StoreValidation { .. } => StatusCode::NOT_FOUND,
            CounterError::StoreCommunication { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind, used as the `error_code` log field.
    pub fn error_code(&self) -> &str {
        match self {
            CounterError::RequestNotRecognized => "RequestNotRecognized",
            CounterError::RecordNotFound => "RecordNotFound",
            CounterError::CounterFieldMissing => "CounterFieldMissing",
            CounterError::InvalidCounterValue(_) => "InvalidCounterValue",
            CounterError::StoreValidation { code, .. }
            | CounterError::StoreCommunication { code, .. } => code,
        }
    }

    /// Detail for the logs. Unlike `Display`, this keeps the raw store message.
    pub fn log_message(&self) -> String {
        match self {
            CounterError::StoreValidation { message, .. }
            | CounterError::StoreCommunication { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Text sent back to the caller.
    pub fn body(&self) -> String {
        if self.status_code() == StatusCode::NOT_FOUND {
            format!("Not Found: {self}")
        } else {
            format!("ERROR: {self}")
        }
    }
}

impl From<StoreError> for CounterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConditionFailed => CounterError::RecordNotFound,
            StoreError::Validation { code, message } => {
                CounterError::StoreValidation { code, message }
            }
            StoreError::Communication { code, message } => {
                CounterError::StoreCommunication { code, message }
            }
        }
    }
}
