#[cfg(feature = "storage-local")]
use crate::LocalObjectStorage;
use crate::{ObjectStorage, StorageResult};
use futures::future::BoxFuture;
use polisher_core::constants::UPLOAD_DEMO_PREFIX;
use polisher_core::{Config, Registry};
use std::path::PathBuf;
use std::sync::Arc;

/// Settings handed to an object storage constructor
#[derive(Debug, Clone)]
pub struct ObjectStorageSettings {
    pub base_dir: PathBuf,
    pub base_url: Option<String>,
    pub route_prefix: String,
}

impl ObjectStorageSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_dir: config.storage_base_dir().to_path_buf(),
            base_url: Some(config.base_url().to_string()),
            route_prefix: UPLOAD_DEMO_PREFIX.to_string(),
        }
    }
}

pub type ObjectStorageConstructor = Box<
    dyn Fn(ObjectStorageSettings) -> BoxFuture<'static, StorageResult<Arc<dyn ObjectStorage>>>
        + Send
        + Sync,
>;

/// Builds object storage backends by name ("local")
pub struct ObjectStorageFactory {
    registry: Registry<ObjectStorageConstructor>,
}

impl Default for ObjectStorageFactory {
    fn default() -> Self {
        let mut registry: Registry<ObjectStorageConstructor> = Registry::new("storage");

        #[cfg(feature = "storage-local")]
        registry.register(
            "local",
            Box::new(|settings: ObjectStorageSettings| {
                Box::pin(async move {
                    let storage = LocalObjectStorage::new(
                        settings.base_dir,
                        settings.base_url,
                        settings.route_prefix,
                    )
                    .await?;
                    Ok(Arc::new(storage) as Arc<dyn ObjectStorage>)
                })
            }),
        );

        Self { registry }
    }
}

impl ObjectStorageFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional backend, replacing any existing one with the same name.
    pub fn register(&mut self, name: &'static str, constructor: ObjectStorageConstructor) {
        self.registry.register(name, constructor);
    }

    pub fn available(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    /// Create the backend registered under `name`
    pub async fn create(
        &self,
        name: &str,
        settings: &ObjectStorageSettings,
    ) -> StorageResult<Arc<dyn ObjectStorage>> {
        let constructor = self.registry.get(name)?;
        let storage = constructor(settings.clone()).await?;

        tracing::info!(
            backend = %storage.backend_type(),
            base_dir = %settings.base_dir.display(),
            "Object storage created"
        );

        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObjectStorageBackend, StorageError};
    use tempfile::tempdir;

    fn settings(dir: &std::path::Path) -> ObjectStorageSettings {
        ObjectStorageSettings {
            base_dir: dir.to_path_buf(),
            base_url: Some("http://localhost:8000".to_string()),
            route_prefix: "/upload-demo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_local() {
        let dir = tempdir().unwrap();
        let factory = ObjectStorageFactory::new();

        let storage = factory.create("local", &settings(dir.path())).await.unwrap();
        assert_eq!(storage.backend_type(), ObjectStorageBackend::Local);
        assert_eq!(factory.available(), vec!["local"]);
    }

    #[tokio::test]
    async fn test_unknown_backend_lists_available() {
        let dir = tempdir().unwrap();
        let factory = ObjectStorageFactory::new();

        let err = factory
            .create("s3", &settings(dir.path()))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StorageError::Unsupported(_)));
        assert_eq!(
            err.to_string(),
            "Unsupported storage type: s3. Supported types are: local"
        );
    }
}
