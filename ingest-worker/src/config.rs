use ingest_config::load_config;
use ingest_config::shared::WorkerConfig;

/// Loads the [`WorkerConfig`] and validates it.
pub fn load_worker_config() -> anyhow::Result<WorkerConfig> {
    let config = load_config::<WorkerConfig>()?;
    config.validate()?;

    Ok(config)
}
