use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Receive batching configuration for the ingestion loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchConfig {
    /// Maximum number of messages requested per poll.
    pub max_messages: i32,
    /// Maximum time, in seconds, a poll waits for messages before returning.
    pub wait_time_secs: i32,
}

impl BatchConfig {
    /// Validates the [`BatchConfig`] against the queue service limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=10).contains(&self.max_messages) {
            return Err(ValidationError::MaxMessagesOutOfRange);
        }

        if !(0..=20).contains(&self.wait_time_secs) {
            return Err(ValidationError::WaitTimeOutOfRange);
        }

        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_messages: 10,
            wait_time_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_batch_config_is_valid() {
        let config = BatchConfig::default();
        assert_eq!(config.max_messages, 10);
        assert_eq!(config.wait_time_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn batch_config_rejects_out_of_range_values() {
        let config = BatchConfig {
            max_messages: 0,
            wait_time_secs: 10,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MaxMessagesOutOfRange)
        ));

        let config = BatchConfig {
            max_messages: 10,
            wait_time_secs: 21,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WaitTimeOutOfRange)
        ));
    }
}
