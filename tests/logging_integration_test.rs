//! Integration tests for logging functionality

use almanac::config::LoggingConfig;
use almanac::domain::AlmanacError;
use almanac::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let result = init_logging("chatty", &LoggingConfig::default());
    assert!(matches!(result, Err(AlmanacError::Configuration(_))));
}

// A global subscriber can only be installed once per test binary, so the
// second install is checked in the same test.
#[test]
fn test_file_logging_creates_directory_once() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    let again = init_logging("info", &config);
    assert!(matches!(again, Err(AlmanacError::Configuration(_))));

    drop(guard);
}
