use serde::{Deserialize, Serialize};

use crate::shared::{BatchConfig, PgConnectionConfig, SqsConfig, ValidationError};

/// Configuration for the ingestion worker service.
///
/// This struct aggregates all configuration required to run the worker: the
/// queue to drain, the Postgres instance rows are written to, and the receive
/// batching parameters.
///
/// The [`WorkerConfig`] is typically deserialized from a configuration file and
/// passed to the worker at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerConfig {
    /// Configuration for the source message queue.
    pub queue: SqsConfig,
    /// Configuration for the target Postgres instance.
    pub pg_connection: PgConnectionConfig,
    /// Receive batching configuration.
    #[serde(default)]
    pub batch: BatchConfig,
}

impl WorkerConfig {
    /// Validates the loaded [`WorkerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if any section fails validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.queue.validate()?;
        self.batch.validate()?;

        Ok(())
    }
}
