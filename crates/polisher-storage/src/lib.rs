//! Demo Polisher Storage Library
//!
//! This crate provides the object storage abstraction, the local filesystem backend,
//! the in-memory key-value store and the upload record repository built on top of it.
//!
//! # Object name format
//!
//! Uploaded demos are stored as `demos/{filename}`. Names are relative paths: they
//! must not be empty, contain `..` or start with `/`. Name generation lives in the
//! `keys` module so every caller agrees on the layout.

pub mod factory;
pub mod keys;
pub mod kv;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;
pub mod upload_record;

// Re-export commonly used types
pub use factory::{ObjectStorageFactory, ObjectStorageSettings};
pub use kv::{DictKv, Kv, KvError, KvFactory};
#[cfg(feature = "storage-local")]
pub use local::LocalObjectStorage;
pub use polisher_core::ObjectStorageBackend;
pub use traits::{ObjectData, ObjectStorage, StorageError, StorageResult, UploadOptions};
pub use upload_record::{KvUploadRecordRepository, UploadRecordRepository};
