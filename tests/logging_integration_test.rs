//! Integration tests for logging functionality

use leadex::config::LoggingConfig;
use leadex::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

// Only one subscriber can be installed per process, so the whole lifecycle
// lives in a single test.
#[test]
fn test_init_logging_with_file_layer() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    assert!(init_logging("verbose", &config).is_err());

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(log_path.is_dir());
    tracing::info!(target: "leadex", "File logging works");

    // A second global subscriber is refused
    assert!(init_logging("info", &LoggingConfig::default()).is_err());

    drop(guard);
}
