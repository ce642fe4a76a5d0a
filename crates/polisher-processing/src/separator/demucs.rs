//! Demucs two-stem separation
//!
//! Runs `demucs --two-stems={target}`, which splits the track into the target
//! stem and everything else (`no_{target}`).

use super::traits::{AudioSourceSeparator, SeparationReport, SeparationRequest, SeparatorError};
use crate::runner::run_tool;
use async_trait::async_trait;
use polisher_core::Stem;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const TOOL: &str = "demucs";

pub struct DemucsSeparator {
    program: String,
    default_target: Stem,
    timeout: Duration,
}

impl DemucsSeparator {
    pub fn new(program: impl Into<String>, default_target: Stem, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            default_target,
            timeout,
        }
    }

    /// The first requested stem wins; otherwise the configured default.
    fn target(&self, request: &SeparationRequest) -> Stem {
        request
            .stem_names
            .as_ref()
            .and_then(|stems| stems.first().copied())
            .unwrap_or(self.default_target)
    }

    fn build_args(
        &self,
        target: Stem,
        input: &Path,
        output_dir: &Path,
        output_filename: Option<&str>,
    ) -> Vec<String> {
        // `{stem}` is expanded by demucs itself.
        let filename = match output_filename {
            Some(prefix) => format!("{}_{{stem}}.wav", prefix),
            None => "{stem}.wav".to_string(),
        };

        vec![
            format!("--two-stems={}", target),
            "--out".to_string(),
            output_dir.to_string_lossy().to_string(),
            "--filename".to_string(),
            filename,
            input.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl AudioSourceSeparator for DemucsSeparator {
    fn name(&self) -> &'static str {
        TOOL
    }

    #[tracing::instrument(skip(self, request, cancel), fields(input = %request.input_file.display()))]
    async fn separate(
        &self,
        request: SeparationRequest,
        cancel: CancellationToken,
    ) -> Result<SeparationReport, SeparatorError> {
        let (input, output_dir) = request.prepare().await?;
        let target = self.target(&request);
        let args = self.build_args(
            target,
            &input,
            &output_dir,
            request.output_filename.as_deref(),
        );

        run_tool(TOOL, &self.program, &args, self.timeout, &cancel).await?;

        tracing::info!(
            target = %target,
            output_dir = %output_dir.display(),
            "Demucs separation finished"
        );

        Ok(SeparationReport {
            tool: TOOL,
            output_dir,
            stems: vec![target.to_string(), format!("no_{}", target)],
        })
    }
}
