use ingest_config::shared::WorkerConfig;
use ingest_telemetry::init_tracing;
use tracing::error;

use crate::config::load_worker_config;
use crate::core::start_worker_with_config;

mod config;
mod core;

fn main() -> anyhow::Result<()> {
    // Load worker config
    let worker_config = load_worker_config()?;

    // Initialize tracing
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    // We start the runtime.
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(worker_config))?;

    Ok(())
}

async fn async_main(worker_config: WorkerConfig) -> anyhow::Result<()> {
    // We start the worker and catch any errors.
    if let Err(err) = start_worker_with_config(worker_config).await {
        error!("an error occurred in the ingestion worker: {err}");

        return Err(err);
    }

    Ok(())
}
