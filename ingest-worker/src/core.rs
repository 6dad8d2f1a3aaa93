use ingest::destination::Destination;
use ingest::destination::postgres::PostgresDestination;
use ingest::pipeline::Pipeline;
use ingest::source::QueueSource;
use ingest::source::sqs::SqsQueueSource;
use ingest_config::shared::{BatchConfig, PgConnectionConfig, SqsConfig, WorkerConfig};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, info, warn};

/// Starts the ingestion worker service with the provided configuration.
///
/// Connects the queue source and the Postgres destination, injects both into
/// the pipeline, and runs the pipeline to completion while listening for
/// shutdown signals.
pub async fn start_worker_with_config(worker_config: WorkerConfig) -> anyhow::Result<()> {
    info!("starting ingestion worker service");

    log_config(&worker_config);

    // Both long-lived collaborators are created once here and reused for the
    // lifetime of the process.
    let source = SqsQueueSource::connect(worker_config.queue).await?;
    let destination = PostgresDestination::connect(worker_config.pg_connection).await?;

    let pipeline = Pipeline::new(worker_config.batch, source, destination);
    start_pipeline(pipeline).await?;

    info!("ingestion worker service completed");

    Ok(())
}

fn log_config(config: &WorkerConfig) {
    log_queue_config(&config.queue);
    log_pg_connection_config(&config.pg_connection);
    log_batch_config(&config.batch);
}

fn log_queue_config(config: &SqsConfig) {
    debug!(
        queue_url = config.queue_url,
        region = config.region,
        endpoint = config.endpoint,
        "queue config"
    );
}

fn log_pg_connection_config(config: &PgConnectionConfig) {
    debug!(
        host = config.host,
        port = config.port,
        dbname = config.name,
        username = config.username,
        "target postgres connection config",
    );
}

fn log_batch_config(config: &BatchConfig) {
    debug!(
        max_messages = config.max_messages,
        wait_time_secs = config.wait_time_secs,
        "batch config"
    );
}

/// Starts a pipeline and handles graceful shutdown signals.
///
/// Launches the pipeline, sets up signal handlers for SIGTERM and SIGINT, and
/// ensures proper cleanup on shutdown. The worker finishes the message it is
/// currently processing before terminating.
async fn start_pipeline<S, D>(mut pipeline: Pipeline<S, D>) -> anyhow::Result<()>
where
    S: QueueSource + Clone + Send + Sync + 'static,
    D: Destination + Clone + Send + Sync + 'static,
{
    // Start the pipeline.
    pipeline.start().await?;

    // Spawn a task to listen for shutdown signals and trigger shutdown.
    let shutdown_tx = pipeline.shutdown_tx();
    let shutdown_handle = tokio::spawn(async move {
        // Listen for SIGTERM, sent by orchestrators before SIGKILL during pod
        // termination.
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("SIGINT (Ctrl+C) received, shutting down pipeline");
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down pipeline");
            }
        }

        if let Err(e) = shutdown_tx.shutdown() {
            warn!("failed to send shutdown signal: {:?}", e);
            return;
        }

        info!("pipeline shutdown successfully")
    });

    // Wait for the pipeline to finish (either normally or via shutdown).
    let result = pipeline.wait().await;

    // Ensure the shutdown task is finished before returning.
    // If the pipeline finished before a signal arrived, we want to abort the
    // shutdown task; if a signal was received, the task has already triggered
    // shutdown and is done.
    shutdown_handle.abort();
    let _ = shutdown_handle.await;

    // Propagate any pipeline error as anyhow error.
    result?;

    Ok(())
}
