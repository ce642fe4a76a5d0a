//! Object storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait that all storage backends must implement.

use crate::ObjectStorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use polisher_core::UnsupportedImplementation;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidKey(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedImplementation),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Payload accepted by [`ObjectStorage::upload`].
pub enum ObjectData {
    /// Raw bytes already in memory.
    Bytes(Vec<u8>),
    /// An existing regular file to copy.
    Path(PathBuf),
    /// Any async reader, consumed until EOF.
    Reader(Pin<Box<dyn AsyncRead + Send + Unpin>>),
}

impl fmt::Debug for ObjectData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectData::Bytes(data) => f.debug_tuple("Bytes").field(&data.len()).finish(),
            ObjectData::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ObjectData::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<Vec<u8>> for ObjectData {
    fn from(data: Vec<u8>) -> Self {
        ObjectData::Bytes(data)
    }
}

impl From<&Path> for ObjectData {
    fn from(path: &Path) -> Self {
        ObjectData::Path(path.to_path_buf())
    }
}

/// Optional attributes for an upload. Backends that cannot persist them ignore them.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl UploadOptions {
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            metadata: HashMap::new(),
        }
    }
}

/// Object storage abstraction trait
///
/// Objects are addressed by a relative name such as `demos/song.wav`. Uploading to an
/// existing name silently replaces its content.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `name` and return the resolved location of the object.
    async fn upload(
        &self,
        name: &str,
        data: ObjectData,
        options: UploadOptions,
    ) -> StorageResult<String>;

    /// Download an object fully into memory
    async fn download(&self, name: &str) -> StorageResult<Vec<u8>>;

    /// Copy an object to `destination`, creating its parent directories.
    async fn download_to_path(&self, name: &str, destination: &Path) -> StorageResult<PathBuf>;

    /// Copy an object into `writer`, returning the number of bytes written.
    async fn download_to_writer(
        &self,
        name: &str,
        writer: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Download an object as a stream of chunks
    async fn download_stream(
        &self,
        name: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>>;

    /// Delete an object. Returns `false` when there was nothing to delete.
    async fn delete(&self, name: &str) -> StorageResult<bool>;

    /// Check if an object exists
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// URL under which the object can be fetched. `expires_in` is a hint that
    /// backends without signed URLs ignore.
    fn get_url(&self, name: &str, expires_in: Option<Duration>) -> StorageResult<String>;

    /// Filesystem path of the object, for backends that keep objects on local disk.
    fn local_path(&self, name: &str) -> Option<PathBuf>;

    /// Get the storage backend type
    fn backend_type(&self) -> ObjectStorageBackend;
}
