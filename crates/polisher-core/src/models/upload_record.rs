use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A processed upload: where the original demo lives and where its stems go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: Uuid,
    /// Original filename as sent by the client (sanitized).
    pub name: String,
    pub uploaded_file_url: String,
    /// Set when separation ran or was queued for this upload.
    pub separated_file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn new(name: impl Into<String>, uploaded_file_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            uploaded_file_url: uploaded_file_url.into(),
            separated_file_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_separated_file_url(mut self, url: impl Into<String>) -> Self {
        self.separated_file_url = Some(url.into());
        self
    }
}
