use crate::keys::validate_object_name;
use crate::traits::{ObjectData, ObjectStorage, StorageError, StorageResult, UploadOptions};
use crate::ObjectStorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;
use polisher_core::constants::LOCAL_OBJECT_STORAGE_ROUTE;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Local filesystem object storage
#[derive(Clone, Debug)]
pub struct LocalObjectStorage {
    base_path: PathBuf,
    base_url: Option<String>,
    route_prefix: String,
}

impl LocalObjectStorage {
    /// Create a new LocalObjectStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for objects (e.g., "files"); created if missing
    /// * `base_url` - Public origin (e.g., "http://localhost:8000"). Without one, URLs are `file://` URIs
    /// * `route_prefix` - Path the serving route is mounted under (e.g., "/upload-demo")
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: Option<String>,
        route_prefix: impl Into<String>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let base_path = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        Ok(LocalObjectStorage {
            base_path,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            route_prefix: route_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert an object name to a filesystem path below the base directory
    fn key_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        validate_object_name(name)?;
        Ok(self.base_path.join(name))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn ensure_exists(&self, name: &str, path: &Path) -> StorageResult<()> {
        if !is_file(path).await {
            return Err(StorageError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

/// Objects are regular files; a directory under the same name is not an object.
async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(
        &self,
        name: &str,
        data: ObjectData,
        options: UploadOptions,
    ) -> StorageResult<String> {
        let path = self.key_to_path(name)?;

        if options.content_type.is_some() || !options.metadata.is_empty() {
            tracing::debug!(
                key = %name,
                content_type = ?options.content_type,
                metadata_keys = options.metadata.len(),
                "Local storage does not persist upload options"
            );
        }

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let size = match data {
            ObjectData::Path(source) => {
                if !is_file(&source).await {
                    return Err(StorageError::InvalidInput(format!(
                        "{} is not an existing file",
                        source.display()
                    )));
                }

                fs::copy(&source, &path).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to copy {} to {}: {}",
                        source.display(),
                        path.display(),
                        e
                    ))
                })?
            }
            ObjectData::Bytes(bytes) => {
                let mut file = fs::File::create(&path).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                file.write_all(&bytes).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to write file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                file.sync_all().await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to sync file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                bytes.len() as u64
            }
            ObjectData::Reader(mut reader) => {
                let mut file = fs::File::create(&path).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                let copied = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to write stream to file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                file.sync_all().await.map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "Failed to sync file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

                copied
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(path.display().to_string())
    }

    async fn download(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(name)?;
        let start = std::time::Instant::now();

        self.ensure_exists(name, &path).await?;

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %name,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(data)
    }

    async fn download_to_path(&self, name: &str, destination: &Path) -> StorageResult<PathBuf> {
        let path = self.key_to_path(name)?;
        let start = std::time::Instant::now();

        self.ensure_exists(name, &path).await?;
        self.ensure_parent_dir(destination).await?;

        let size = fs::copy(&path, destination).await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                destination.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            destination = %destination.display(),
            key = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download_to_path successful"
        );

        Ok(destination.to_path_buf())
    }

    async fn download_to_writer(
        &self,
        name: &str,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64> {
        let path = self.key_to_path(name)?;

        self.ensure_exists(name, &path).await?;

        let mut file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let written = tokio::io::copy(&mut file, writer).await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to copy {} into writer: {}",
                path.display(),
                e
            ))
        })?;
        writer.flush().await?;

        Ok(written)
    }

    async fn download_stream(
        &self,
        name: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>> {
        let path = self.key_to_path(name)?;
        let start = std::time::Instant::now();

        self.ensure_exists(name, &path).await?;

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let key = name.to_string();
        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    path = %path_display,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream download error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn delete(&self, name: &str) -> StorageResult<bool> {
        let path = self.key_to_path(name)?;
        let start = std::time::Instant::now();

        if !is_file(&path).await {
            return Ok(false);
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(true)
    }

    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.key_to_path(name)?;
        Ok(is_file(&path).await)
    }

    fn get_url(&self, name: &str, _expires_in: Option<Duration>) -> StorageResult<String> {
        let path = self.key_to_path(name)?;

        match &self.base_url {
            Some(base_url) => {
                let encoded = name
                    .split('/')
                    .map(|segment| urlencoding::encode(segment).into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                Ok(format!(
                    "{}{}{}/{}",
                    base_url, self.route_prefix, LOCAL_OBJECT_STORAGE_ROUTE, encoded
                ))
            }
            None => Ok(format!("file://{}", path.display())),
        }
    }

    fn local_path(&self, name: &str) -> Option<PathBuf> {
        self.key_to_path(name).ok()
    }

    fn backend_type(&self) -> ObjectStorageBackend {
        ObjectStorageBackend::Local
    }
}
