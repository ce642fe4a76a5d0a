//! Demo Polisher Core Library
//!
//! This crate provides the configuration, error types, implementation registry and
//! domain models shared by the storage, processing and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod registry;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{SeparationMode, Stem, UploadRecord};
pub use registry::{Registry, UnsupportedImplementation};
pub use storage_types::ObjectStorageBackend;
