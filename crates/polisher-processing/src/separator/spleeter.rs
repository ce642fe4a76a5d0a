//! Spleeter multi-stem separation
//!
//! The pretrained model is picked from the number of requested stems: 2, 4 or 5.
//! Any other count falls back to the 4-stem model.

use super::traits::{
    file_stem, AudioSourceSeparator, SeparationReport, SeparationRequest, SeparatorError,
};
use crate::runner::run_tool;
use async_trait::async_trait;
use polisher_core::Stem;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const TOOL: &str = "spleeter";

const TWO_STEMS: [Stem; 2] = [Stem::Vocals, Stem::Accompaniment];
const FOUR_STEMS: [Stem; 4] = [Stem::Vocals, Stem::Drums, Stem::Bass, Stem::Other];
const FIVE_STEMS: [Stem; 5] = [Stem::Vocals, Stem::Drums, Stem::Bass, Stem::Piano, Stem::Other];

/// Pretrained model name and the stems it produces
fn model_for(stem_count: usize) -> (&'static str, &'static [Stem]) {
    match stem_count {
        2 => ("spleeter:2stems", &TWO_STEMS),
        5 => ("spleeter:5stems", &FIVE_STEMS),
        _ => ("spleeter:4stems", &FOUR_STEMS),
    }
}

pub struct SpleeterSeparator {
    program: String,
    timeout: Duration,
}

impl SpleeterSeparator {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn build_args(
        &self,
        model: &str,
        input: &Path,
        output_dir: &Path,
        output_filename: &str,
    ) -> Vec<String> {
        vec![
            "separate".to_string(),
            "-p".to_string(),
            model.to_string(),
            "-o".to_string(),
            output_dir.to_string_lossy().to_string(),
            "-f".to_string(),
            // `{instrument}` and `{codec}` are expanded by spleeter.
            format!("{}_{{instrument}}.{{codec}}", output_filename),
            input.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl AudioSourceSeparator for SpleeterSeparator {
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

        let stem_count = request
            .stem_names
            .as_ref()
            .map(|stems| stems.len())
            .unwrap_or(FOUR_STEMS.len());
        let (model, stems) = model_for(stem_count);

        let output_filename = request
            .output_filename
            .clone()
            .unwrap_or_else(|| file_stem(&input));
        let args = self.build_args(model, &input, &output_dir, &output_filename);

        run_tool(TOOL, &self.program, &args, self.timeout, &cancel).await?;

        tracing::info!(
            model = %model,
            output_dir = %output_dir.display(),
            "Spleeter separation finished"
        );

        Ok(SeparationReport {
            tool: TOOL,
            output_dir,
            stems: stems.iter().map(|stem| stem.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_model_selection() {
        assert_eq!(model_for(2).0, "spleeter:2stems");
        assert_eq!(model_for(2).1, &[Stem::Vocals, Stem::Accompaniment]);
        assert_eq!(model_for(4).0, "spleeter:4stems");
        assert_eq!(model_for(5).0, "spleeter:5stems");
        assert!(model_for(5).1.contains(&Stem::Piano));
        assert_eq!(model_for(3).0, "spleeter:4stems");
        assert_eq!(model_for(0).0, "spleeter:4stems");
    }

    #[test]
    fn test_args() {
        let separator = SpleeterSeparator::new("spleeter", Duration::from_secs(5));
        let args = separator.build_args(
            "spleeter:2stems",
            Path::new("/data/song.wav"),
            Path::new("/data/separated"),
            "song",
        );
        assert_eq!(
            args,
            vec![
                "separate",
                "-p",
                "spleeter:2stems",
                "-o",
                "/data/separated",
                "-f",
                "song_{instrument}.{codec}",
                "/data/song.wav",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_spawn() {
        let dir = tempdir().unwrap();
        let separator = SpleeterSeparator::new("/nonexistent/spleeter", Duration::from_secs(5));

        let result = separator
            .separate(
                SeparationRequest::new(dir.path().join("missing.wav"), dir.path().join("out")),
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(SeparatorError::NotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_five_stem_request() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("song.wav");
        std::fs::write(&input, b"B").unwrap();
        let separator = SpleeterSeparator::new("true", Duration::from_secs(5));

        let request = SeparationRequest::new(&input, dir.path().join("separated")).with_stems(vec![
            Stem::Vocals,
            Stem::Drums,
            Stem::Bass,
            Stem::Piano,
            Stem::Other,
        ]);
        let report = separator
            .separate(request, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.tool, "spleeter");
        assert_eq!(report.stems, vec!["vocals", "drums", "bass", "piano", "other"]);
    }
}
