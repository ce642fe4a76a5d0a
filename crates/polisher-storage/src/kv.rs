//! In-memory key-value store
//!
//! Values are arbitrary JSON. `DictKv` keeps everything in a process-local map,
//! so its contents disappear on restart.

use async_trait::async_trait;
use polisher_core::{Registry, UnsupportedImplementation};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum KvError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedImplementation),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Kv store rejected write for key {0}")]
    PutRejected(String),
}

#[async_trait]
pub trait Kv: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    /// Returns `false` if the store did not accept the write.
    async fn put(&self, key: &str, value: Value) -> bool;

    /// Remove `key`. Returns `false` if it was not present.
    async fn zap(&self, key: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct DictKv {
    entries: RwLock<HashMap<String, Value>>,
}

impl DictKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Kv for DictKv {
    async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    async fn put(&self, key: &str, value: Value) -> bool {
        self.entries.write().await.insert(key.to_string(), value);
        tracing::debug!(key = %key, "Kv put");
        true
    }

    async fn zap(&self, key: &str) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        tracing::debug!(key = %key, removed, "Kv zap");
        removed
    }
}

pub type KvConstructor = Box<dyn Fn() -> Arc<dyn Kv> + Send + Sync>;

/// Builds key-value stores by name ("dict")
pub struct KvFactory {
    registry: Registry<KvConstructor>,
}

impl Default for KvFactory {
    fn default() -> Self {
        let registry = Registry::new("kv")
            .with("dict", Box::new(|| Arc::new(DictKv::new()) as Arc<dyn Kv>) as KvConstructor);
        Self { registry }
    }
}

impl KvFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, constructor: KvConstructor) {
        self.registry.register(name, constructor);
    }

    pub fn available(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn create(&self, name: &str) -> Result<Arc<dyn Kv>, KvError> {
        let constructor = self.registry.get(name)?;
        tracing::info!(backend = %name, "Key-value store created");
        Ok(constructor())
    }
}
