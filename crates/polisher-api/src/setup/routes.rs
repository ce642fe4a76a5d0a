//! Route configuration and setup
//!
//! The local object storage route is mounted here rather than by the storage
//! backend, so storage construction never needs a router.

use crate::handlers;
use crate::middleware::error_details_middleware;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use polisher_core::constants::{LOCAL_OBJECT_STORAGE_ROUTE, UPLOAD_DEMO_PREFIX};
use polisher_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let upload_demo_root = format!("{}/", UPLOAD_DEMO_PREFIX);
    let result_page = format!("{}/result", UPLOAD_DEMO_PREFIX);
    let object_route = format!(
        "{}{}/{{*path}}",
        UPLOAD_DEMO_PREFIX, LOCAL_OBJECT_STORAGE_ROUTE
    );

    let body_limit = config.max_audio_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    tracing::info!(
        body_limit_bytes = body_limit,
        http_concurrency_limit = config.http_concurrency_limit(),
        "HTTP limits configured"
    );

    Router::new()
        .route("/", get(handlers::root::index))
        .route("/health", get(handlers::health::health_check))
        .route(
            UPLOAD_DEMO_PREFIX,
            get(handlers::upload_demo::get_form).post(handlers::upload_demo::post_upload),
        )
        .route(
            &upload_demo_root,
            get(handlers::upload_demo::get_form).post(handlers::upload_demo::post_upload),
        )
        .route(&result_page, get(handlers::upload_demo::get_result))
        .route(&object_route, get(handlers::object_storage::serve_object))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            error_details_middleware,
        ))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
