use axum::response::Redirect;
use polisher_core::constants::UPLOAD_DEMO_PREFIX;

pub async fn index() -> Redirect {
    Redirect::temporary(&format!("{}/", UPLOAD_DEMO_PREFIX))
}
