//! Builds the application through the production setup path.

use polisher_api::setup::build_app;
use polisher_core::config::PolisherConfig;
use polisher_core::Config;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_build_app_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from(PolisherConfig {
        storage_base_dir: dir.path().join("files"),
        ..PolisherConfig::default()
    });

    let (state, router) = build_app(&config, CancellationToken::new()).await.unwrap();
    assert!(dir.path().join("files").is_dir());
    assert_eq!(state.separation.runner.separator_name(), "demucs");
    assert!(state.separation.queue.is_none());

    let server = axum_test::TestServer::new(router).unwrap();
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_build_app_rejects_unknown_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from(PolisherConfig {
        storage_base_dir: dir.path().to_path_buf(),
        kv_backend: "redis".to_string(),
        ..PolisherConfig::default()
    });

    let err = build_app(&config, CancellationToken::new())
        .await
        .err()
        .unwrap();
    let message = format!("{:#}", err);
    assert!(message.contains("Unsupported kv type: redis"), "{message}");
}

#[tokio::test]
async fn test_async_mode_starts_queue() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = CancellationToken::new();
    let config = Config::from(PolisherConfig {
        storage_base_dir: dir.path().to_path_buf(),
        separation_mode: polisher_core::SeparationMode::Async,
        separator: "spleeter".to_string(),
        ..PolisherConfig::default()
    });

    let (state, _router) = build_app(&config, shutdown.clone()).await.unwrap();
    assert_eq!(state.separation.runner.separator_name(), "spleeter");
    assert!(state.separation.queue.is_some());

    shutdown.cancel();
}
