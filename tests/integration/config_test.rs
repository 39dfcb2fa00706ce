use std::fs;

use actmon::MonitorConfig;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "refresh_interval_ms": 2000, "cpu_threshold": 70.0, "notifications_enabled": false }"#,
    )
    .unwrap();

    let config = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(config.refresh_interval_ms, 2000);
    assert_eq!(config.cpu_threshold, 70.0);
    assert!(!config.notifications_enabled);
    assert!(config.alerts_enabled);
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "\n").unwrap();

    assert_eq!(MonitorConfig::load_from(&path).unwrap(), MonitorConfig::default());
}

#[test]
fn test_invalid_or_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let err = MonitorConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));

    fs::write(&path, "{ not json").unwrap();
    let err = MonitorConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_file_values_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "refresh_interval_ms": 5 }"#).unwrap();

    let (config, warnings) = MonitorConfig::load_from(&path).unwrap().validated();
    assert_eq!(config.refresh_interval_ms, 100);
    assert_eq!(warnings.len(), 1);
}
