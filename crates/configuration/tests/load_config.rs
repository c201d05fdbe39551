use chrono::NaiveDate;
use configuration::{Config, StorageBackend, load_config_from};
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn defaults_are_valid() {
    let config = Config::default();
    config.validate().unwrap();
    assert_eq!(config.calendar.system_start_date, NaiveDate::from_ymd_opt(2025, 6, 26).unwrap());
    assert_eq!(config.calendar.window_size, 12);
    assert_eq!(config.analytics.recent_cycles, 8);
    assert_eq!(config.analytics.insights.exceptional_roi_pct, dec!(20));
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let file = write_config(
        r#"
[calendar]
window_size = 6

[analytics.insights]
burn_rate_alert = 250

[storage]
backend = "postgres"
"#,
    );

    let config = load_config_from(file.path()).unwrap();
    assert_eq!(config.calendar.window_size, 6);
    assert_eq!(config.calendar.system_start_date, NaiveDate::from_ymd_opt(2025, 6, 26).unwrap());
    assert_eq!(config.analytics.insights.burn_rate_alert, dec!(250));
    assert_eq!(config.analytics.insights.high_efficiency_pct, dec!(30));
    assert_eq!(config.storage.backend, StorageBackend::Postgres);
}

#[test]
fn custom_thursday_epoch_is_accepted() {
    let file = write_config("[calendar]\nsystem_start_date = \"2026-01-01\"\n");
    let config = load_config_from(file.path()).unwrap();
    let calendar = config.cycle_calendar().unwrap();
    assert_eq!(calendar.epoch(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
}

#[test]
fn non_thursday_epoch_is_rejected() {
    let file = write_config("[calendar]\nsystem_start_date = \"2025-06-27\"\n");
    let err = load_config_from(file.path()).unwrap_err();
    assert!(err.to_string().contains("system_start_date"), "{err}");
}

#[test]
fn zero_window_is_rejected() {
    let file = write_config("[calendar]\nwindow_size = 0\n");
    assert!(load_config_from(file.path()).is_err());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_config_from(&dir.path().join("absent.toml")).is_err());
}
