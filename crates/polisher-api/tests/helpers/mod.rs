//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p polisher-api`.

use async_trait::async_trait;
use axum_test::TestServer;
use polisher_api::setup::routes;
use polisher_api::state::{AppState, SeparationState};
use polisher_core::config::PolisherConfig;
use polisher_core::constants::{SEPARATED_DIR, UPLOAD_DEMO_PREFIX};
use polisher_core::{Config, SeparationMode, UploadRecord};
use polisher_processing::{SeparationQueue, SeparationRunner, SeparatorFactory, SeparatorSettings};
use polisher_storage::{
    DictKv, KvError, KvUploadRecordRepository, LocalObjectStorage, ObjectStorage,
    UploadRecordRepository,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

pub const TEST_BASE_URL: &str = "http://localhost:8000";

/// Options for building a test application
pub struct TestAppOptions {
    pub separation_mode: SeparationMode,
    pub demucs_path: String,
    pub max_audio_size_bytes: usize,
    pub environment: String,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            separation_mode: SeparationMode::Disabled,
            demucs_path: "demucs".to_string(),
            max_audio_size_bytes: 10 * 1024 * 1024,
            environment: "development".to_string(),
        }
    }
}

/// Keeps a copy of every stored record so tests can inspect them.
pub struct RecordingUploadRecords {
    inner: KvUploadRecordRepository,
    stored: Mutex<Vec<UploadRecord>>,
}

impl RecordingUploadRecords {
    pub fn last(&self) -> Option<UploadRecord> {
        self.stored.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl UploadRecordRepository for RecordingUploadRecords {
    async fn get(&self, id: uuid::Uuid) -> Result<Option<UploadRecord>, KvError> {
        self.inner.get(id).await
    }

    async fn put(&self, record: &UploadRecord) -> Result<(), KvError> {
        self.inner.put(record).await?;
        self.stored.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn zap(&self, id: uuid::Uuid) -> Result<bool, KvError> {
        self.inner.zap(id).await
    }
}

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub kv: Arc<DictKv>,
    pub records: Arc<RecordingUploadRecords>,
    pub storage: Arc<dyn ObjectStorage>,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn base_dir(&self) -> &std::path::Path {
        self._temp_dir.path()
    }
}

/// Setup test app with local storage in a temp dir and separation disabled.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut inner = PolisherConfig {
        storage_base_dir: temp_dir.path().to_path_buf(),
        separation_mode: options.separation_mode,
        demucs_path: options.demucs_path.clone(),
        separation_timeout_secs: 30,
        max_audio_size_bytes: options.max_audio_size_bytes,
        ..PolisherConfig::default()
    };
    inner.base.base_url = TEST_BASE_URL.to_string();
    inner.base.environment = options.environment;
    let config = Config::from(inner);

    let storage: Arc<dyn ObjectStorage> = Arc::new(
        LocalObjectStorage::new(
            temp_dir.path(),
            Some(TEST_BASE_URL.to_string()),
            UPLOAD_DEMO_PREFIX,
        )
        .await
        .expect("Failed to create local storage"),
    );

    let kv = Arc::new(DictKv::new());
    let records = Arc::new(RecordingUploadRecords {
        inner: KvUploadRecordRepository::new(kv.clone()),
        stored: Mutex::new(Vec::new()),
    });

    let settings = SeparatorSettings {
        demucs_path: options.demucs_path,
        timeout: Duration::from_secs(30),
        ..SeparatorSettings::default()
    };
    let separator = SeparatorFactory::new()
        .create("demucs", &settings)
        .expect("demucs separator is registered");
    let runner = SeparationRunner::new(separator, 2);

    let shutdown = CancellationToken::new();
    let queue = (options.separation_mode == SeparationMode::Async)
        .then(|| SeparationQueue::new(runner.clone(), 4, shutdown.clone()));

    let state = Arc::new(AppState {
        config: config.clone(),
        storage: storage.clone(),
        upload_records: records.clone(),
        separation: SeparationState {
            mode: options.separation_mode,
            runner,
            queue,
            output_dir: temp_dir.path().join(SEPARATED_DIR),
            shutdown,
        },
    });

    let router = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        kv,
        records,
        storage,
        state,
        _temp_dir: temp_dir,
    }
}
