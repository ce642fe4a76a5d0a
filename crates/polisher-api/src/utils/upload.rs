//! Multipart helpers for the upload form

use axum::extract::Multipart;
use polisher_core::constants::AUDIO_DEMO_FIELD;
use polisher_core::AppError;

/// The audio demo as received from the form
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

/// Read the `audio_demo_file` field fully into memory.
/// Other fields are ignored; a second `audio_demo_file` field is rejected.
pub async fn extract_audio_demo_file(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<UploadedFile, AppError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(AUDIO_DEMO_FIELD) {
            continue;
        }

        if upload.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple {} fields are not allowed",
                AUDIO_DEMO_FIELD
            )));
        }

        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;
        validate_file_size(data.len(), max_size)?;

        upload = Some(UploadedFile {
            data: data.to_vec(),
            filename: filename.unwrap_or_else(|| "unknown".to_string()),
            content_type,
        });
    }

    upload.ok_or_else(|| AppError::InvalidInput(format!("No {} provided", AUDIO_DEMO_FIELD)))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Longest file name most filesystems accept, in bytes.
const MAX_FILENAME_BYTES: usize = 255;

/// Sanitize filename to prevent path traversal and invalid characters.
/// Returns an error if the name is `.` or `..` once directories are stripped.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    // Browsers on Windows may send the full client path.
    let filename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    if filename == "." || filename == ".." {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(truncate_filename(&sanitized, MAX_FILENAME_BYTES))
}

/// Cut `filename` to at most `max_bytes`, on a char boundary, keeping the extension.
fn truncate_filename(filename: &str, max_bytes: usize) -> String {
    if filename.len() <= max_bytes {
        return filename.to_string();
    }

    let (stem, extension) = match filename.rfind('.') {
        Some(dot) if dot > 0 && filename.len() - dot <= max_bytes / 2 => {
            filename.split_at(dot)
        }
        _ => (filename, ""),
    };

    let budget = max_bytes - extension.len();
    let mut end = budget.min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{}", &stem[..end], extension)
}
