//! Tests for error handling

use savant_config::ConfigError;
use std::io;
use std::path::PathBuf;

/// Test ConfigError::Io displays correctly
#[test]
fn test_io_error_display() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err = ConfigError::Io(io_err);

    let display = format!("{}", err);
    assert!(display.contains("config I/O error"));
    assert!(display.contains("file not found"));
}

/// Test ConfigError::Json displays correctly
#[test]
fn test_json_error_display() {
    let json_err: serde_json::Error =
        serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
    let err = ConfigError::Json(json_err);

    assert!(err.to_string().contains("malformed config"));
}

#[test]
fn test_not_found_error_display() {
    let err = ConfigError::NotFound(PathBuf::from("/some/path"));

    let display = format!("{}", err);
    assert!(display.contains("config not found"));
    assert!(display.contains("/some/path"));
}

#[test]
fn test_invalid_error_display() {
    let err = ConfigError::Invalid("RUNPOD_API_KEY is not set".to_string());
    assert_eq!(err.to_string(), "invalid config: RUNPOD_API_KEY is not set");
}

/// Test ConfigError::Io from io::Error conversion
#[test]
fn test_io_error_from() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "no permission");
    let err: ConfigError = io_err.into();

    match err {
        ConfigError::Io(_) => (),
        _ => panic!("Expected Io variant"),
    }
}

#[tokio::test]
async fn test_load_malformed_file_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = savant_config::Config::load_from(&path).await;
    assert!(matches!(result, Err(ConfigError::Json(_))));
}
