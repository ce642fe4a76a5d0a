//! Shared object name rules.
//!
//! Name format for uploaded demos: `demos/{filename}`.

use crate::traits::{StorageError, StorageResult};
use polisher_core::constants::DEMOS_PREFIX;
use std::path::{Component, Path};

/// Object name for an uploaded demo file.
pub fn demo_object_name(filename: &str) -> String {
    format!("{}/{}", DEMOS_PREFIX, filename)
}

/// Reject names that are empty, absolute or able to escape the storage root.
pub fn validate_object_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidKey(
            "Object name must not be empty".to_string(),
        ));
    }

    if name.starts_with('/') || name.starts_with('\\') {
        return Err(StorageError::InvalidKey(
            "Object name contains invalid characters".to_string(),
        ));
    }

    if !Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(StorageError::InvalidKey(
            "Object name resolves outside storage directory".to_string(),
        ));
    }

    Ok(())
}
