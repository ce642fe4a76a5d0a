use crate::error::ErrorDetails;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Error responses are rendered without details. Outside production the full body
/// attached by [`crate::error::HttpAppError`] replaces it, keeping the status.
pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetails(body)) = response.extensions_mut().remove::<ErrorDetails>() else {
        return response;
    };
    if state.config.is_production() {
        return response;
    }

    (response.status(), Json(body)).into_response()
}
