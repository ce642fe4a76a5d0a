//! Upload pipeline: store the demo, optionally separate it, record the upload.
//!
//! States: `Received -> Stored -> (Separated | SeparationQueued | SeparationSkipped)
//! -> Redirected`. The handler performs the last transition once a record exists.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{sanitize_filename, UploadedFile};
use crate::validation::content_type_for;
use polisher_core::constants::SEPARATED_DIR;
use polisher_core::{AppError, SeparationMode, UploadRecord};
use polisher_processing::{SeparationJob, SeparationReport, SeparationRequest};
use polisher_storage::keys::demo_object_name;
use polisher_storage::{ObjectData, UploadOptions};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Stored,
    Separated,
    SeparationQueued,
    SeparationSkipped,
    Redirected,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Received => "received",
            PipelineState::Stored => "stored",
            PipelineState::Separated => "separated",
            PipelineState::SeparationQueued => "separation_queued",
            PipelineState::SeparationSkipped => "separation_skipped",
            PipelineState::Redirected => "redirected",
        };
        f.write_str(name)
    }
}

pub fn log_transition(object_name: &str, state: PipelineState) {
    tracing::info!(object = %object_name, state = %state, "Upload pipeline transition");
}

/// Run the pipeline for one uploaded file and return the stored record.
#[tracing::instrument(skip(state, upload), fields(filename = %upload.filename, mode = %state.separation.mode))]
pub async fn process_upload(
    state: &AppState,
    upload: UploadedFile,
) -> Result<UploadRecord, HttpAppError> {
    let start = Instant::now();

    let filename = sanitize_filename(&upload.filename)?;
    let object_name = demo_object_name(&filename);
    log_transition(&object_name, PipelineState::Received);

    let content_type = upload
        .content_type
        .clone()
        .unwrap_or_else(|| content_type_for(&filename).to_string());
    let size_bytes = upload.data.len();

    state
        .storage
        .upload(
            &object_name,
            ObjectData::Bytes(upload.data),
            UploadOptions::with_content_type(content_type),
        )
        .await?;
    let uploaded_file_url = state.storage.get_url(&object_name, None)?;
    log_transition(&object_name, PipelineState::Stored);

    let mut record = UploadRecord::new(&filename, uploaded_file_url);

    let prefix = output_prefix(&filename);
    let (separation_state, report) = separate(state, &object_name, &filename, &prefix).await?;
    if let Some(report) = report {
        match first_stem_object(state, &prefix, &report).await? {
            Some(stem_object) => {
                record = record.with_separated_file_url(state.storage.get_url(&stem_object, None)?);
            }
            None => tracing::warn!(
                output_dir = %report.output_dir.display(),
                "Separator finished but no stem file was found"
            ),
        }
    }
    log_transition(&object_name, separation_state);

    state.upload_records.put(&record).await?;

    tracing::info!(
        record_id = %record.id,
        size_bytes,
        duration_ms = start.elapsed().as_millis(),
        "Upload processed"
    );

    Ok(record)
}

/// Stem files are named `{prefix}_{stem}.wav`, the prefix being the upload's file stem.
fn output_prefix(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Separated stems are only known once the tool has run, so async and disabled
/// modes return no report.
async fn separate(
    state: &AppState,
    object_name: &str,
    filename: &str,
    prefix: &str,
) -> Result<(PipelineState, Option<SeparationReport>), HttpAppError> {
    let separation = &state.separation;
    if separation.mode == SeparationMode::Disabled {
        return Ok((PipelineState::SeparationSkipped, None));
    }

    let input = separation_input(state, object_name, filename).await?;
    let request =
        SeparationRequest::new(input, &separation.output_dir).with_output_filename(prefix);

    match separation.mode {
        SeparationMode::Sync => {
            let report = separation
                .runner
                .run(request, separation.shutdown.child_token())
                .await?;
            tracing::info!(
                tool = report.tool,
                stems = ?report.stems,
                output_dir = %report.output_dir.display(),
                "Separation finished"
            );
            Ok((PipelineState::Separated, Some(report)))
        }
        SeparationMode::Async => {
            let queue = separation.queue.as_ref().ok_or_else(|| {
                AppError::Internal("Separation queue is not running".to_string())
            })?;
            queue.submit(SeparationJob::new(request))?;
            Ok((PipelineState::SeparationQueued, None))
        }
        SeparationMode::Disabled => Ok((PipelineState::SeparationSkipped, None)),
    }
}

/// Object name of the first stem the separator wrote. Tools may nest their output
/// one directory deep (demucs uses the model name), so those directories are searched too.
async fn first_stem_object(
    state: &AppState,
    prefix: &str,
    report: &SeparationReport,
) -> Result<Option<String>, HttpAppError> {
    let mut dirs = vec![SEPARATED_DIR.to_string()];
    if let Ok(mut entries) = tokio::fs::read_dir(&report.output_dir).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if let (true, Some(name)) = (is_dir, entry.file_name().to_str()) {
                dirs.push(format!("{}/{}", SEPARATED_DIR, name));
            }
        }
    }

    for stem in &report.stems {
        for dir in &dirs {
            let candidate = format!("{}/{}_{}.wav", dir, prefix, stem);
            if state.storage.exists(&candidate).await? {
                return Ok(Some(candidate));
            }
        }
    }
    Ok(None)
}

/// Filesystem path the separator reads from. Backends without local files are
/// downloaded to the system temp directory first.
async fn separation_input(
    state: &AppState,
    object_name: &str,
    filename: &str,
) -> Result<PathBuf, HttpAppError> {
    if let Some(path) = state.storage.local_path(object_name) {
        return Ok(path);
    }

    let destination = std::env::temp_dir()
        .join("polisher")
        .join(format!("{}_{}", uuid::Uuid::new_v4(), filename));
    let path = state
        .storage
        .download_to_path(object_name, &destination)
        .await?;
    tracing::debug!(path = %path.display(), "Downloaded object for separation");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(PipelineState::Received.to_string(), "received");
        assert_eq!(PipelineState::SeparationQueued.to_string(), "separation_queued");
        assert_eq!(PipelineState::Redirected.to_string(), "redirected");
    }

    #[test]
    fn test_output_prefix_is_file_stem() {
        assert_eq!(output_prefix("song.wav"), "song");
        assert_eq!(output_prefix("demo...final.wav"), "demo...final");
        assert_eq!(output_prefix("take"), "take");
    }
}
