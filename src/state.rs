use std::sync::Arc;

use crate::{
    config::{Backend, Config},
    db::{self, CounterStore},
};

/// Resources built once per execution environment and shared by every
/// invocation.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn CounterStore>,
}

impl AppState {
    pub async fn new(config: Config) -> Self {
        let db = match config.backend {
            Backend::Memory => {
                tracing::info!("Using in-memory counter backend");
                db::memory()
            }
            Backend::DynamoDb => {
                tracing::info!(
                    table_name = %config.table_name,
                    region = ?config.region,
                    "Using DynamoDB counter backend"
                );
                db::dynamo(&config).await
            }
        };

        Self { db }
    }

    /// State backed by an existing store, e.g. a seeded [`db::MemoryDb`].
    pub fn with_store(db: Arc<dyn CounterStore>) -> Self {
        Self { db }
    }
}
