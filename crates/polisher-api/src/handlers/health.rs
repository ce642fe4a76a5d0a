use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: String,
    pub kv: String,
    pub separator: &'static str,
    pub separation_mode: String,
    pub separation_slots_available: usize,
    /// Free queue slots; absent unless separation runs in async mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separation_queue_capacity: Option<usize>,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let separation = &state.separation;
    Json(HealthResponse {
        status: "healthy",
        storage: state.storage.backend_type().to_string(),
        kv: state.config.kv_backend().to_string(),
        separator: separation.runner.separator_name(),
        separation_mode: separation.mode.to_string(),
        separation_slots_available: separation.runner.available_permits(),
        separation_queue_capacity: separation
            .queue
            .as_ref()
            .map(|queue| queue.remaining_capacity()),
    })
}
