//! Configuration module
//!
//! Configuration is read from the process environment (after loading an optional
//! `.env` file). Every setting has a default so the demo runs with no configuration
//! at all; `validate` catches values that would only fail later at request time.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::SeparationMode;

// Common constants
const SERVER_PORT: u16 = 8000;
const STORAGE_BASE_DIR: &str = "files";
const STORAGE_BACKEND: &str = "local";
const KV_BACKEND: &str = "dict";
const SEPARATOR: &str = "demucs";
const DEMUCS_TWO_STEM_TARGET: &str = "drums";
const SEPARATION_TIMEOUT_SECS: u64 = 1800;
const MAX_CONCURRENT_SEPARATIONS: usize = 2;
const SEPARATION_QUEUE_SIZE: usize = 100;
const MAX_AUDIO_SIZE_MB: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    /// Public origin used to build object URLs, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub http_concurrency_limit: usize,
}

/// Application configuration: storage, key-value store and separation settings.
#[derive(Clone, Debug)]
pub struct PolisherConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: String,
    pub storage_base_dir: PathBuf,
    pub kv_backend: String,
    // Separation configuration
    pub separator: String,
    pub separation_mode: SeparationMode,
    pub demucs_path: String,
    pub demucs_two_stem_target: String,
    pub spleeter_path: String,
    pub separation_timeout_secs: u64,
    pub max_concurrent_separations: usize,
    pub separation_queue_size: usize,
    // Upload limits
    pub max_audio_size_bytes: usize,
}

impl Default for PolisherConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                environment: "development".to_string(),
                base_url: format!("http://localhost:{}", SERVER_PORT),
                http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            },
            storage_backend: STORAGE_BACKEND.to_string(),
            storage_base_dir: PathBuf::from(STORAGE_BASE_DIR),
            kv_backend: KV_BACKEND.to_string(),
            separator: SEPARATOR.to_string(),
            separation_mode: SeparationMode::Disabled,
            demucs_path: "demucs".to_string(),
            demucs_two_stem_target: DEMUCS_TWO_STEM_TARGET.to_string(),
            spleeter_path: "spleeter".to_string(),
            separation_timeout_secs: SEPARATION_TIMEOUT_SECS,
            max_concurrent_separations: MAX_CONCURRENT_SEPARATIONS,
            separation_queue_size: SEPARATION_QUEUE_SIZE,
            max_audio_size_bytes: MAX_AUDIO_SIZE_MB * 1024 * 1024,
        }
    }
}

impl PolisherConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            environment,
            base_url: env::var("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        let separation_mode = match env::var("SEPARATION_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => SeparationMode::Disabled,
        };

        let max_audio_size_mb = env::var("MAX_AUDIO_SIZE_MB")
            .unwrap_or_else(|_| MAX_AUDIO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_AUDIO_SIZE_MB);

        Ok(PolisherConfig {
            base,
            storage_backend: env::var("STORAGE_BACKEND")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| STORAGE_BACKEND.to_string()),
            storage_base_dir: env::var("STORAGE_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(STORAGE_BASE_DIR)),
            kv_backend: env::var("KV_BACKEND")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| KV_BACKEND.to_string()),
            separator: env::var("SEPARATOR")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| SEPARATOR.to_string()),
            separation_mode,
            demucs_path: env::var("DEMUCS_PATH").unwrap_or_else(|_| "demucs".to_string()),
            demucs_two_stem_target: env::var("DEMUCS_TWO_STEM_TARGET")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| DEMUCS_TWO_STEM_TARGET.to_string()),
            spleeter_path: env::var("SPLEETER_PATH").unwrap_or_else(|_| "spleeter".to_string()),
            separation_timeout_secs: env::var("SEPARATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| SEPARATION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(SEPARATION_TIMEOUT_SECS),
            max_concurrent_separations: env::var("MAX_CONCURRENT_SEPARATIONS")
                .unwrap_or_else(|_| MAX_CONCURRENT_SEPARATIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONCURRENT_SEPARATIONS),
            separation_queue_size: env::var("SEPARATION_QUEUE_SIZE")
                .unwrap_or_else(|_| SEPARATION_QUEUE_SIZE.to_string())
                .parse()
                .unwrap_or(SEPARATION_QUEUE_SIZE),
            max_audio_size_bytes: max_audio_size_mb * 1024 * 1024,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.base.base_url.starts_with("http://") && !self.base.base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "BASE_URL must start with http:// or https:// (got '{}')",
                self.base.base_url
            ));
        }

        for (name, value) in [
            ("STORAGE_BACKEND", &self.storage_backend),
            ("KV_BACKEND", &self.kv_backend),
            ("SEPARATOR", &self.separator),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{} must not be empty", name));
            }
        }

        if self.max_concurrent_separations == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_SEPARATIONS must be at least 1"
            ));
        }

        if self.separation_queue_size == 0 {
            return Err(anyhow::anyhow!("SEPARATION_QUEUE_SIZE must be at least 1"));
        }

        if self.separation_timeout_secs == 0 {
            return Err(anyhow::anyhow!("SEPARATION_TIMEOUT_SECS must be at least 1"));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PolisherConfig>);

impl Config {
    fn inner(&self) -> &PolisherConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PolisherConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    // Convenience getters
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn base_url(&self) -> &str {
        &self.inner().base.base_url
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn storage_backend(&self) -> &str {
        &self.inner().storage_backend
    }

    pub fn storage_base_dir(&self) -> &Path {
        &self.inner().storage_base_dir
    }

    pub fn kv_backend(&self) -> &str {
        &self.inner().kv_backend
    }

    pub fn separator(&self) -> &str {
        &self.inner().separator
    }

    pub fn separation_mode(&self) -> SeparationMode {
        self.inner().separation_mode
    }

    pub fn demucs_path(&self) -> &str {
        &self.inner().demucs_path
    }

    pub fn demucs_two_stem_target(&self) -> &str {
        &self.inner().demucs_two_stem_target
    }

    pub fn spleeter_path(&self) -> &str {
        &self.inner().spleeter_path
    }

    pub fn separation_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().separation_timeout_secs)
    }

    pub fn max_concurrent_separations(&self) -> usize {
        self.inner().max_concurrent_separations
    }

    pub fn separation_queue_size(&self) -> usize {
        self.inner().separation_queue_size
    }

    pub fn max_audio_size_bytes(&self) -> usize {
        self.inner().max_audio_size_bytes
    }
}

impl From<PolisherConfig> for Config {
    fn from(config: PolisherConfig) -> Self {
        Config(Box::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::from(PolisherConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.server_port(), 8000);
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.separation_mode(), SeparationMode::Disabled);
        assert_eq!(config.storage_base_dir(), Path::new("files"));
        assert_eq!(config.max_audio_size_bytes(), 100 * 1024 * 1024);
        assert!(!config.is_production());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut inner = PolisherConfig::default();
        inner.base.base_url = "localhost:8000".to_string();
        let err = Config::from(inner).validate().unwrap_err();
        assert!(err.to_string().contains("BASE_URL"));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let inner = PolisherConfig {
            max_concurrent_separations: 0,
            ..PolisherConfig::default()
        };
        assert!(Config::from(inner).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_separator() {
        let inner = PolisherConfig {
            separator: "  ".to_string(),
            ..PolisherConfig::default()
        };
        let err = Config::from(inner).validate().unwrap_err();
        assert!(err.to_string().contains("SEPARATOR"));
    }

    #[test]
    fn test_is_production() {
        let mut inner = PolisherConfig::default();
        inner.base.environment = "Prod".to_string();
        assert!(Config::from(inner).is_production());
    }
}
