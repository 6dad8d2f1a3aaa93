use serde::{Deserialize, Serialize};

use crate::SerializableSecretString;
use crate::shared::ValidationError;

/// Configuration for connecting to an SQS-compatible message queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SqsConfig {
    /// Full URL of the queue to consume from.
    pub queue_url: String,
    /// AWS region the queue lives in.
    pub region: String,
    /// Custom endpoint URL, used when pointing at a local queue emulator.
    pub endpoint: Option<String>,
    /// Static access key id. When unset, the default credentials chain is used.
    pub access_key_id: Option<String>,
    /// Static secret access key. Sensitive and redacted in debug output.
    pub secret_access_key: Option<SerializableSecretString>,
}

impl SqsConfig {
    /// Validates the [`SqsConfig`].
    ///
    /// Checks that the queue URL and region are present and that static
    /// credentials, when supplied, are supplied as a pair.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_url.is_empty() {
            return Err(ValidationError::EmptyQueueUrl);
        }

        if self.region.is_empty() {
            return Err(ValidationError::EmptyRegion);
        }

        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(ValidationError::PartialCredentials);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SqsConfig {
        SqsConfig {
            queue_url: "http://localhost:4566/000000000000/login-queue".to_string(),
            region: "us-east-1".to_string(),
            endpoint: Some("http://localhost:4566".to_string()),
            access_key_id: Some("dummy".to_string()),
            secret_access_key: Some("dummy".to_string().into()),
        }
    }

    #[test]
    fn valid_queue_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn empty_queue_url_fails_validation() {
        let mut config = valid_config();
        config.queue_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyQueueUrl)
        ));
    }

    #[test]
    fn partial_credentials_fail_validation() {
        let mut config = valid_config();
        config.secret_access_key = None;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::PartialCredentials)
        ));
    }
}
