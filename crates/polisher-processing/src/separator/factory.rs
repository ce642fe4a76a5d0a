#[cfg(feature = "demucs")]
use super::demucs::DemucsSeparator;
#[cfg(feature = "spleeter")]
use super::spleeter::SpleeterSeparator;
use super::traits::{AudioSourceSeparator, SeparatorError};
use polisher_core::{Config, Registry, Stem};
use std::sync::Arc;
use std::time::Duration;

/// Settings handed to a separator constructor
#[derive(Debug, Clone)]
pub struct SeparatorSettings {
    pub demucs_path: String,
    pub demucs_two_stem_target: Stem,
    pub spleeter_path: String,
    pub timeout: Duration,
}

impl Default for SeparatorSettings {
    fn default() -> Self {
        Self {
            demucs_path: "demucs".to_string(),
            demucs_two_stem_target: Stem::Drums,
            spleeter_path: "spleeter".to_string(),
            timeout: Duration::from_secs(1800),
        }
    }
}

impl SeparatorSettings {
    pub fn from_config(config: &Config) -> Result<Self, SeparatorError> {
        let demucs_two_stem_target = config
            .demucs_two_stem_target()
            .parse::<Stem>()
            .map_err(|e| SeparatorError::Config(format!("DEMUCS_TWO_STEM_TARGET: {}", e)))?;

        Ok(Self {
            demucs_path: config.demucs_path().to_string(),
            demucs_two_stem_target,
            spleeter_path: config.spleeter_path().to_string(),
            timeout: config.separation_timeout(),
        })
    }
}

pub type SeparatorConstructor =
    Box<dyn Fn(&SeparatorSettings) -> Arc<dyn AudioSourceSeparator> + Send + Sync>;

/// Builds separators by name ("demucs", "spleeter")
pub struct SeparatorFactory {
    registry: Registry<SeparatorConstructor>,
}

impl Default for SeparatorFactory {
    fn default() -> Self {
        let mut registry: Registry<SeparatorConstructor> = Registry::new("separator");

        #[cfg(feature = "demucs")]
        registry.register(
            "demucs",
            Box::new(|settings: &SeparatorSettings| {
                Arc::new(DemucsSeparator::new(
                    settings.demucs_path.clone(),
                    settings.demucs_two_stem_target,
                    settings.timeout,
                )) as Arc<dyn AudioSourceSeparator>
            }),
        );

        #[cfg(feature = "spleeter")]
        registry.register(
            "spleeter",
            Box::new(|settings: &SeparatorSettings| {
                Arc::new(SpleeterSeparator::new(
                    settings.spleeter_path.clone(),
                    settings.timeout,
                )) as Arc<dyn AudioSourceSeparator>
            }),
        );

        Self { registry }
    }
}

impl SeparatorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, constructor: SeparatorConstructor) {
        self.registry.register(name, constructor);
    }

    pub fn available(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn create(
        &self,
        name: &str,
        settings: &SeparatorSettings,
    ) -> Result<Arc<dyn AudioSourceSeparator>, SeparatorError> {
        let constructor = self.registry.get(name)?;
        let separator = constructor(settings);

        tracing::info!(
            separator = separator.name(),
            timeout_secs = settings.timeout.as_secs(),
            "Audio source separator created"
        );

        Ok(separator)
    }
}
