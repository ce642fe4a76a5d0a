//! Serves objects written by the local object storage backend.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::validation::content_type_for;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
};
use futures::StreamExt;
use polisher_core::AppError;
use std::sync::Arc;

#[tracing::instrument(skip(state), fields(operation = "serve_object"))]
pub async fn serve_object(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response<Body>, HttpAppError> {
    let stream = state.storage.download_stream(&path).await?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&path))
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
