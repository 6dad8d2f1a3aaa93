//! Core pipeline orchestration and execution.
//!
//! Contains the main [`Pipeline`] struct that connects a queue source to a
//! destination through the ingest worker. Manages the worker lifecycle and
//! shutdown coordination.

use ingest_config::shared::BatchConfig;
use tracing::{error, info};

use crate::concurrency::shutdown::{ShutdownTx, create_shutdown_channel};
use crate::destination::base::Destination;
use crate::error::IngestResult;
use crate::source::base::QueueSource;
use crate::workers::base::{Worker, WorkerHandle};
use crate::workers::ingest::{IngestWorker, IngestWorkerHandle};

/// Internal state tracking for pipeline lifecycle.
///
/// Tracks whether the pipeline has been started and maintains the handle to the
/// running worker. The pipeline can only be in one of these states at a time.
#[derive(Debug)]
enum PipelineState {
    /// Pipeline has been created but not yet started.
    NotStarted,
    /// Pipeline is running with an active ingest worker.
    Started {
        ingest_worker: IngestWorkerHandle,
    },
}

/// The ingestion pipeline connecting a queue source to a destination.
///
/// A [`Pipeline`] drains login-event messages from its source, normalizes and
/// masks them, and persists one row per event through its destination,
/// acknowledging each message only after its row has been committed. The run
/// ends when the queue reports empty.
#[derive(Debug)]
pub struct Pipeline<S, D> {
    config: BatchConfig,
    source: S,
    destination: D,
    state: PipelineState,
    shutdown_tx: ShutdownTx,
}

impl<S, D> Pipeline<S, D>
where
    S: QueueSource + Clone + Send + Sync + 'static,
    D: Destination + Clone + Send + Sync + 'static,
{
    /// Creates a new pipeline with the given configuration.
    ///
    /// The pipeline is initially in the not-started state and must be
    /// explicitly started using [`Pipeline::start`]. The source and the
    /// destination are injected here: the pipeline owns no connection
    /// bootstrapping of its own.
    pub fn new(config: BatchConfig, source: S, destination: D) -> Self {
        // We create a watch channel of unit types since this is just used to
        // notify all subscribers that shutdown is needed.
        let (shutdown_tx, _) = create_shutdown_channel();

        Self {
            config,
            source,
            destination,
            state: PipelineState::NotStarted,
            shutdown_tx,
        }
    }

    /// Returns a handle for sending shutdown signals to this pipeline.
    ///
    /// Multiple components can hold shutdown handles to coordinate graceful
    /// termination.
    pub fn shutdown_tx(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Starts the pipeline and begins draining the queue.
    pub async fn start(&mut self) -> IngestResult<()> {
        info!(
            max_messages = self.config.max_messages,
            wait_time_secs = self.config.wait_time_secs,
            "starting ingestion pipeline"
        );

        let ingest_worker = IngestWorker::new(
            self.config.clone(),
            self.source.clone(),
            self.destination.clone(),
            self.shutdown_tx.subscribe(),
        )
        .start()
        .await?;

        self.state = PipelineState::Started { ingest_worker };

        Ok(())
    }

    /// Waits for the pipeline to complete all processing and terminate.
    ///
    /// This method blocks until the ingest worker has finished its work. If the
    /// pipeline was never started, this returns immediately.
    pub async fn wait(self) -> IngestResult<()> {
        let PipelineState::Started { ingest_worker } = self.state else {
            info!("pipeline was not started, nothing to wait for");

            return Ok(());
        };

        info!("waiting for ingest worker to complete");

        ingest_worker.wait().await
    }

    /// Initiates graceful shutdown of the pipeline.
    ///
    /// Sends the shutdown signal to the worker, instructing it to stop at the
    /// next poll. This method returns immediately after sending the signal and
    /// does not wait for the worker to actually stop.
    ///
    /// Use [`Pipeline::wait`] after calling this method to wait for complete
    /// shutdown.
    pub fn shutdown(&self) {
        info!("trying to shut down the pipeline");

        if let Err(err) = self.shutdown_tx.shutdown() {
            error!("failed to send shutdown signal to the pipeline: {}", err);
            return;
        }

        info!("shut down signal successfully sent to the worker");
    }

    /// Initiates shutdown and waits for complete pipeline termination.
    ///
    /// This convenience method combines [`Pipeline::shutdown`] and
    /// [`Pipeline::wait`] to provide a single call that both initiates shutdown
    /// and waits for completion.
    pub async fn shutdown_and_wait(self) -> IngestResult<()> {
        self.shutdown();
        self.wait().await
    }
}
