use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::Client;
use ingest_config::shared::SqsConfig;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::error::{ErrorKind, IngestError, IngestResult};
use crate::ingest_error;
use crate::source::base::{QueueMessage, QueueSource};

/// SQS-backed implementation of [`QueueSource`].
///
/// Holds the single queue client created at process start and reused for the
/// lifetime of the worker.
#[derive(Debug, Clone)]
pub struct SqsQueueSource {
    client: Client,
    queue_url: String,
}

impl SqsQueueSource {
    /// Creates a new SQS queue source from configuration.
    ///
    /// Static credentials and a custom endpoint are honored when configured,
    /// which is how local queue emulators are targeted; otherwise the default
    /// AWS credentials chain applies.
    pub async fn connect(config: SqsConfig) -> IngestResult<SqsQueueSource> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = aws_sdk_sqs::config::Credentials::new(
                access_key_id.clone(),
                secret_access_key.expose_secret().to_string(),
                None,
                None,
                "static",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        let client = Client::new(&sdk_config);

        Ok(SqsQueueSource {
            client,
            queue_url: config.queue_url,
        })
    }
}

impl QueueSource for SqsQueueSource {
    async fn receive(
        &self,
        max_messages: i32,
        wait_time: Duration,
    ) -> IngestResult<Vec<QueueMessage>> {
        let response = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_time.as_secs() as i32)
            .send()
            .await
            .map_err(|err| {
                ingest_error!(
                    ErrorKind::QueueReceiveFailed,
                    "Failed to receive messages from the queue",
                    err
                )
            })?;

        let messages: Vec<QueueMessage> = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|message| {
                let body = message.body?;
                let receipt_handle = message.receipt_handle?;

                Some(QueueMessage {
                    body,
                    receipt_handle,
                })
            })
            .collect();

        debug!("received {} messages from the queue", messages.len());

        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> IngestResult<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|err| {
                ingest_error!(
                    ErrorKind::QueueAckFailed,
                    "Failed to delete message from the queue",
                    err
                )
            })?;

        Ok(())
    }
}
