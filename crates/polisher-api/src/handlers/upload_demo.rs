//! Upload demo pages: form, upload and result.

use crate::document;
use crate::error::HttpAppError;
use crate::services::upload_pipeline::{log_transition, process_upload, PipelineState};
use crate::state::AppState;
use crate::utils::upload::extract_audio_demo_file;
use axum::{
    extract::{Multipart, State},
    response::{Html, Redirect},
};
use polisher_core::constants::{AUDIO_DEMO_FIELD, UPLOAD_DEMO_PREFIX};
use std::sync::Arc;

pub async fn get_form() -> Html<String> {
    document::response(&format!(
        r#"<main class="container">
            <form method="post" enctype="multipart/form-data">
                <fieldset>
                    <label>
                        Audio Demo File
                        <input
                            name="{field}"
                            type="file"
                            placeholder="Audio Demo File"
                            autocomplete="{field}"
                            required
                        />
                    </label>
                </fieldset>
                <input type="submit" value="Submit" />
            </form>
        </main>"#,
        field = AUDIO_DEMO_FIELD
    ))
}

#[tracing::instrument(skip(state, multipart), fields(operation = "upload_demo"))]
pub async fn post_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, HttpAppError> {
    let upload = extract_audio_demo_file(multipart, state.config.max_audio_size_bytes()).await?;
    let record = process_upload(&state, upload).await?;

    let object_name = polisher_storage::keys::demo_object_name(&record.name);
    log_transition(&object_name, PipelineState::Redirected);

    Ok(Redirect::to(&format!("{}/result", UPLOAD_DEMO_PREFIX)))
}

pub async fn get_result() -> Html<String> {
    document::response(
        r#"<main class="container">
            <h1>Result</h1>
        </main>"#,
    )
}
