//! # Logging Tests
//!
//! File output and global initialization.

use logging::LoggingConfig;

#[test]
fn test_file_logging_creates_guard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devcollab.log");

    let config = LoggingConfig {
        format: "json".to_string(),
        log_file: Some(path.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let (subscriber, guard) = config.build();
    assert!(guard.is_some());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(project_id = "p1", "Project created");
    });
    drop(guard);

    let written = std::fs::read_dir(dir.path()).unwrap().count();
    assert!(written >= 1);
}

#[test]
fn test_init_twice_fails() {
    let config = LoggingConfig::default();
    let first = logging::init_with_config(config.clone());
    assert!(first.is_ok());
    assert!(logging::init_with_config(config).is_err());
}
