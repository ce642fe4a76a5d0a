//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Storage, key-value and
//! separator errors convert into [`AppError`] here, so every failure renders the same
//! JSON body and is logged at the level its metadata asks for.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use polisher_core::{AppError, ErrorMetadata, LogLevel};
use polisher_processing::SeparatorError;
use polisher_storage::{KvError, StorageError};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Full error body attached to every error response. The error details middleware
/// swaps it in outside production.
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub ErrorResponse);

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: both the trait and AppError live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app_error = match err {
            StorageError::NotFound(name) => AppError::NotFound(name),
            StorageError::InvalidKey(msg) | StorageError::InvalidInput(msg) => {
                AppError::InvalidInput(msg)
            }
            StorageError::Unsupported(unsupported) => {
                AppError::UnsupportedImplementation(unsupported)
            }
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app_error)
    }
}

impl From<KvError> for HttpAppError {
    fn from(err: KvError) -> Self {
        let app_error = match err {
            KvError::Unsupported(unsupported) => AppError::UnsupportedImplementation(unsupported),
            KvError::Serialization(e) => AppError::Kv(e.to_string()),
            err @ KvError::PutRejected(_) => AppError::Kv(err.to_string()),
        };
        HttpAppError(app_error)
    }
}

impl From<SeparatorError> for HttpAppError {
    fn from(err: SeparatorError) -> Self {
        let app_error = match err {
            SeparatorError::NotFound(path) => {
                AppError::NotFound(format!("Separation input {}", path.display()))
            }
            SeparatorError::Unsupported(unsupported) => {
                AppError::UnsupportedImplementation(unsupported)
            }
            SeparatorError::TimedOut { timeout, .. } => AppError::SeparationTimedOut {
                seconds: timeout.as_secs(),
            },
            SeparatorError::QueueFull => AppError::SeparationQueueFull,
            err @ (SeparatorError::Spawn { .. }
            | SeparatorError::ExternalToolFailure { .. }
            | SeparatorError::Cancelled { .. }) => AppError::Separation(err.to_string()),
            other => AppError::Internal(other.to_string()),
        };
        HttpAppError(app_error)
    }
}

pub fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl HttpAppError {
    fn body(&self, is_production: bool) -> ErrorResponse {
        let app_error = &self.0;
        let show_details = !is_production && !app_error.is_sensitive();

        ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        let mut response = (status, Json(self.body(true))).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetails(self.body(false)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn status_of(err: impl Into<HttpAppError>) -> u16 {
        err.into().0.http_status_code()
    }

    #[test]
    fn test_storage_error_mapping() {
        assert_eq!(status_of(StorageError::NotFound("demos/a.wav".into())), 404);
        assert_eq!(status_of(StorageError::InvalidKey("../a".into())), 400);
        assert_eq!(status_of(StorageError::UploadFailed("disk full".into())), 500);
    }

    #[test]
    fn test_separator_error_mapping() {
        assert_eq!(
            status_of(SeparatorError::NotFound(PathBuf::from("/tmp/song.wav"))),
            404
        );
        assert_eq!(
            status_of(SeparatorError::ExternalToolFailure {
                tool: "demucs",
                status: Some(1),
                stderr: "boom".into(),
            }),
            500
        );
        assert_eq!(
            status_of(SeparatorError::TimedOut {
                tool: "demucs",
                timeout: Duration::from_secs(3),
            }),
            504
        );
        assert_eq!(status_of(SeparatorError::QueueFull), 503);
    }

    #[test]
    fn test_tool_failure_keeps_stderr_in_details() {
        let err: HttpAppError = SeparatorError::ExternalToolFailure {
            tool: "spleeter",
            status: Some(2),
            stderr: "model missing".into(),
        }
        .into();
        assert!(matches!(&err.0, AppError::Separation(msg) if msg.contains("model missing")));
    }

    #[test]
    fn test_details_hidden_in_production() {
        let err = HttpAppError(AppError::NotFound("demos/a.wav".into()));

        let body = err.body(true);
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert_eq!(body.code, err.0.error_code());

        let body = err.body(false);
        assert!(body.details.is_some());
    }

    #[test]
    fn test_response_carries_details_extension() {
        let response = HttpAppError(AppError::NotFound("demos/a.wav".into())).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let details = response.extensions().get::<ErrorDetails>().unwrap();
        assert!(details.0.details.is_some());
    }

    #[test]
    fn test_rejected_kv_write_is_kv_error() {
        let err: HttpAppError = KvError::PutRejected("upload_record:1".into()).into();
        assert!(matches!(&err.0, AppError::Kv(msg) if msg.contains("upload_record:1")));
        assert_eq!(err.0.http_status_code(), 500);
    }
}
