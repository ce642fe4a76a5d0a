use polisher_core::{Config, SeparationMode};
use polisher_processing::{SeparationQueue, SeparationRunner};
use polisher_storage::{ObjectStorage, UploadRecordRepository};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn ObjectStorage>,
    pub upload_records: Arc<dyn UploadRecordRepository>,
    pub separation: SeparationState,
}

/// Separation configuration and runtime handles
#[derive(Clone)]
pub struct SeparationState {
    pub mode: SeparationMode,
    pub runner: SeparationRunner,
    /// Present only in `async` mode
    pub queue: Option<SeparationQueue>,
    /// Directory that receives stem files, `{base_dir}/demos/separated`
    pub output_dir: PathBuf,
    /// Fired on server shutdown; stops the queue and kills running tools
    pub shutdown: CancellationToken,
}
