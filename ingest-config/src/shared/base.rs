use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The queue URL must be provided.
    #[error("`queue_url` cannot be empty")]
    EmptyQueueUrl,
    /// The queue region must be provided.
    #[error("`region` cannot be empty")]
    EmptyRegion,
    /// A receive call can request between 1 and 10 messages.
    #[error("`max_messages` must be between 1 and 10")]
    MaxMessagesOutOfRange,
    /// A receive call can wait at most 20 seconds.
    #[error("`wait_time_secs` must be between 0 and 20")]
    WaitTimeOutOfRange,
    /// Static credentials must be provided together.
    #[error("`access_key_id` and `secret_access_key` must be set together")]
    PartialCredentials,
}
