use std::env;

use thiserror::Error;

pub const TABLE_NAME_VAR: &str = "DYNAMODB_TABLE_NAME";
pub const REGION_VAR: &str = "AWS_REGION";
pub const BACKEND_VAR: &str = "COUNTER_BACKEND";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    DynamoDb,
    Memory,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DYNAMODB_TABLE_NAME must be set to the counter table name")]
    MissingTableName,
    #[error("unknown COUNTER_BACKEND value {0:?}, expected \"dynamodb\" or \"memory\"")]
    UnknownBackend(String),
}

/// Process configuration, resolved once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    /// Empty only for the in-memory backend.
    pub table_name: String,
    /// Overrides the SDK's default region chain when set.
    pub region: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend = match non_blank(BACKEND_VAR).as_deref() {
            None | Some("dynamodb") => Backend::DynamoDb,
            Some("memory") => Backend::Memory,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let table_name = match (backend, non_blank(TABLE_NAME_VAR)) {
            (_, Some(name)) => name,
            (Backend::Memory, None) => String::new(),
            (Backend::DynamoDb, None) => return Err(ConfigError::MissingTableName),
        };

        Ok(Self {
            backend,
            table_name,
            region: non_blank(REGION_VAR),
        })
    }
}
