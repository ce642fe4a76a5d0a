//! Storage setup and initialization

use anyhow::{Context, Result};
use polisher_core::Config;
use polisher_storage::{ObjectStorage, ObjectStorageFactory, ObjectStorageSettings};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    tracing::info!(backend = %config.storage_backend(), "Initializing object storage...");

    let settings = ObjectStorageSettings::from_config(config);
    let storage = ObjectStorageFactory::new()
        .create(config.storage_backend(), &settings)
        .await
        .context("Failed to create object storage")?;

    tracing::info!(
        backend = %storage.backend_type(),
        "Object storage initialized successfully"
    );

    Ok(storage)
}
