//! Audio source separator trait
//!
//! A separator reads one mixed audio file and writes named stem files into an
//! output directory. Implementations wrap an external tool; the input file is
//! never modified.

use async_trait::async_trait;
use polisher_core::{Stem, UnsupportedImplementation};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum SeparatorError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedImplementation),

    #[error("Invalid separator configuration: {0}")]
    Config(String),

    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {}: {stderr}", describe_status(.status))]
    ExternalToolFailure {
        tool: &'static str,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{tool} did not finish within {}s", .timeout.as_secs())]
    TimedOut { tool: &'static str, timeout: Duration },

    #[error("{tool} was cancelled")]
    Cancelled { tool: &'static str },

    #[error("Separation queue is full")]
    QueueFull,

    #[error("Separation queue is shut down")]
    QueueClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// What to separate and where the stems go.
#[derive(Debug, Clone)]
pub struct SeparationRequest {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    /// Prefix for the stem files. Demucs omits it when absent; Spleeter falls back
    /// to the input's file stem.
    pub output_filename: Option<String>,
    /// Stems to produce. Each separator interprets the list its own way.
    pub stem_names: Option<Vec<Stem>>,
}

impl SeparationRequest {
    pub fn new(input_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            output_dir: output_dir.into(),
            output_filename: None,
            stem_names: None,
        }
    }

    pub fn with_output_filename(mut self, output_filename: impl Into<String>) -> Self {
        self.output_filename = Some(output_filename.into());
        self
    }

    pub fn with_stems(mut self, stems: Vec<Stem>) -> Self {
        self.stem_names = Some(stems);
        self
    }

    /// Check the input exists, create the output directory and return both as
    /// absolute paths.
    pub async fn prepare(&self) -> Result<(PathBuf, PathBuf), SeparatorError> {
        if !tokio::fs::try_exists(&self.input_file).await.unwrap_or(false) {
            return Err(SeparatorError::NotFound(self.input_file.clone()));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let input = tokio::fs::canonicalize(&self.input_file).await?;
        let output = tokio::fs::canonicalize(&self.output_dir).await?;
        Ok((input, output))
    }
}

/// Outcome of a successful separation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationReport {
    pub tool: &'static str,
    pub output_dir: PathBuf,
    /// Stem names the tool was asked to produce, e.g. `["drums", "no_drums"]`.
    pub stems: Vec<String>,
}

#[async_trait]
pub trait AudioSourceSeparator: Send + Sync {
    /// Tool name used in logs and errors
    fn name(&self) -> &'static str;

    async fn separate(
        &self,
        request: SeparationRequest,
        cancel: CancellationToken,
    ) -> Result<SeparationReport, SeparatorError>;
}

/// File stem of `path`, used as the default output prefix.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_prepare_missing_input() {
        let dir = tempdir().unwrap();
        let request = SeparationRequest::new(dir.path().join("missing.wav"), dir.path().join("out"));

        let result = request.prepare().await;
        assert!(matches!(result, Err(SeparatorError::NotFound(_))));
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_prepare_creates_output_dir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("song.wav");
        std::fs::write(&input, b"B").unwrap();
        let request = SeparationRequest::new(&input, dir.path().join("out/nested"));

        let (input_abs, output_abs) = request.prepare().await.unwrap();
        assert!(input_abs.is_absolute());
        assert!(output_abs.is_dir());
    }

    #[test]
    fn test_exit_failure_message() {
        let err = SeparatorError::ExternalToolFailure {
            tool: "demucs",
            status: Some(2),
            stderr: "bad input".to_string(),
        };
        assert_eq!(err.to_string(), "demucs exited with status 2: bad input");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("/tmp/song.wav")), "song");
    }
}
