//! Data models for the application

mod separation;
mod upload_record;

pub use separation::{SeparationMode, Stem};
pub use upload_record::UploadRecord;
