//! The single worker that drives the consume-transform-persist loop.

use std::time::Duration;

use ingest_config::shared::BatchConfig;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::concurrency::shutdown::ShutdownRx;
use crate::conversions::event::parse_login_event;
use crate::destination::base::Destination;
use crate::error::{ErrorKind, IngestError, IngestResult};
use crate::ingest_error;
use crate::source::base::{QueueMessage, QueueSource};
use crate::workers::base::{Worker, WorkerHandle};

/// A handle to the running ingest worker task.
#[derive(Debug)]
pub struct IngestWorkerHandle {
    handle: JoinHandle<IngestResult<()>>,
}

impl WorkerHandle for IngestWorkerHandle {
    async fn wait(self) -> IngestResult<()> {
        self.handle
            .await
            .map_err(|err| ingest_error!(ErrorKind::Unknown, "Ingest worker task failed", err))?
    }
}

/// The worker that drains the queue into the destination.
///
/// Messages are processed strictly one at a time, in the order received: a
/// message is fully normalized, persisted and acknowledged before the next one
/// is looked at. The run ends when a poll comes back empty or when a shutdown
/// signal arrives while polling.
#[derive(Debug)]
pub struct IngestWorker<S, D> {
    config: BatchConfig,
    source: S,
    destination: D,
    shutdown_rx: ShutdownRx,
}

impl<S, D> IngestWorker<S, D> {
    pub fn new(config: BatchConfig, source: S, destination: D, shutdown_rx: ShutdownRx) -> Self {
        Self {
            config,
            source,
            destination,
            shutdown_rx,
        }
    }
}

impl<S, D> Worker<IngestWorkerHandle> for IngestWorker<S, D>
where
    S: QueueSource + Send + Sync + 'static,
    D: Destination + Send + Sync + 'static,
{
    type Error = IngestError;

    async fn start(self) -> Result<IngestWorkerHandle, Self::Error> {
        info!("starting ingest worker");

        let handle = tokio::spawn(run_loop(self));

        Ok(IngestWorkerHandle { handle })
    }
}

/// Runs the poll/drain loop until the queue reports empty, a shutdown signal
/// arrives, or a fatal error occurs.
async fn run_loop<S, D>(worker: IngestWorker<S, D>) -> IngestResult<()>
where
    S: QueueSource + Send + Sync + 'static,
    D: Destination + Send + Sync + 'static,
{
    let IngestWorker {
        config,
        source,
        destination,
        mut shutdown_rx,
    } = worker;

    let wait_time = Duration::from_secs(config.wait_time_secs as u64);

    loop {
        // The bounded poll is the only place the loop yields to the
        // environment, so the shutdown signal races it.
        let messages = tokio::select! {
            _ = shutdown_rx.changed() => {
                info!("shutdown signal received, stopping ingest worker");
                break;
            }
            result = source.receive(config.max_messages, wait_time) => result?,
        };

        // An empty response is treated as end of stream: the worker drains a
        // backlog to completion, it does not poll forever.
        if messages.is_empty() {
            info!("queue returned no messages, ending the run");
            break;
        }

        debug!("draining a batch of {} messages", messages.len());

        for message in messages {
            process_message(&source, &destination, message).await?;
        }
    }

    info!("ingest worker completed");

    Ok(())
}

/// Processes a single message: normalize, persist, acknowledge.
///
/// A missing required field is the one recoverable failure: the message is
/// left unacknowledged (the queue will redeliver it under its own policy) and
/// the batch continues. Every other failure propagates and ends the run, with
/// the rest of the batch left in the queue.
async fn process_message<S, D>(
    source: &S,
    destination: &D,
    message: QueueMessage,
) -> IngestResult<()>
where
    S: QueueSource,
    D: Destination,
{
    let event = match parse_login_event(&message.body) {
        Ok(event) => event,
        Err(err) if err.kind() == ErrorKind::MissingField => {
            warn!(error = %err, "skipping message with a missing required field");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    destination.write_login(event).await?;

    // Acknowledge strictly after the commit: a crash in between produces a
    // harmless duplicate row on redelivery, never a lost message.
    source.delete(&message.receipt_handle).await?;

    Ok(())
}
