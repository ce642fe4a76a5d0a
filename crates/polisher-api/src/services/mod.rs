pub mod upload_pipeline;

pub use upload_pipeline::{process_upload, PipelineState};
