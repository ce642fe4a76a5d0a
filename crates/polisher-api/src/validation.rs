//! Content-type lookup for stored objects
//!
//! Local storage does not persist the uploaded content type, so the serving route
//! derives it from the object name's extension.

use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for `name`, based on its (case-insensitive) extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        // Audio
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "aiff" | "aif" => "audio/aiff",
        // Spleeter output codec
        "wma" => "audio/x-ms-wma",
        // Other
        "json" => "application/json",
        "txt" => "text/plain",
        _ => {
            tracing::debug!(
                name = %name,
                extension = %extension,
                "Unknown extension, serving as octet-stream"
            );
            DEFAULT_CONTENT_TYPE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_content_types() {
        assert_eq!(content_type_for("demos/song.wav"), "audio/wav");
        assert_eq!(content_type_for("demos/SONG.MP3"), "audio/mpeg");
        assert_eq!(content_type_for("demos/separated/song_vocals.flac"), "audio/flac");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for("demos/song"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("demos/song.xyz"), DEFAULT_CONTENT_TYPE);
    }
}
