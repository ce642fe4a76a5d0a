//! Service initialization and application state setup

use crate::state::{AppState, SeparationState};
use anyhow::{Context, Result};
use polisher_core::constants::SEPARATED_DIR;
use polisher_core::{Config, SeparationMode};
use polisher_processing::{SeparationQueue, SeparationRunner, SeparatorFactory, SeparatorSettings};
use polisher_storage::{KvFactory, KvUploadRecordRepository, ObjectStorage};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub fn initialize_services(
    config: &Config,
    storage: Arc<dyn ObjectStorage>,
    shutdown: CancellationToken,
) -> Result<Arc<AppState>> {
    let kv = KvFactory::new()
        .create(config.kv_backend())
        .context("Failed to create key-value store")?;
    let upload_records = Arc::new(KvUploadRecordRepository::new(kv));
    tracing::info!(backend = %config.kv_backend(), "Upload record repository initialized");

    let separation = setup_separation(config, shutdown)?;

    Ok(Arc::new(AppState {
        config: config.clone(),
        storage,
        upload_records,
        separation,
    }))
}

fn setup_separation(config: &Config, shutdown: CancellationToken) -> Result<SeparationState> {
    let settings =
        SeparatorSettings::from_config(config).context("Invalid separator configuration")?;
    let separator = SeparatorFactory::new()
        .create(config.separator(), &settings)
        .context("Failed to create audio source separator")?;

    let runner = SeparationRunner::new(separator, config.max_concurrent_separations());

    // Only async mode needs the background worker pool.
    let queue = match config.separation_mode() {
        SeparationMode::Async => Some(SeparationQueue::new(
            runner.clone(),
            config.separation_queue_size(),
            shutdown.clone(),
        )),
        SeparationMode::Sync | SeparationMode::Disabled => None,
    };

    tracing::info!(
        mode = %config.separation_mode(),
        separator = runner.separator_name(),
        max_concurrent = runner.max_concurrent(),
        "Separation initialized"
    );

    Ok(SeparationState {
        mode: config.separation_mode(),
        runner,
        queue,
        output_dir: config.storage_base_dir().join(SEPARATED_DIR),
        shutdown,
    })
}
