use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use refill_app::{
    initialize_logging, AppConfig, ConfigError, FormSession, LogDestination, CONFIG_FILENAME,
};
use refill_core::Msg;
use refill_engine::{slots, FileStore, KeyValueStore};
use tempfile::TempDir;

#[test]
fn missing_config_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = AppConfig::load(&temp.path().join(CONFIG_FILENAME)).unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.base_url, "http://localhost:8090");
    assert_eq!(
        config.client_settings().endpoint().unwrap().as_str(),
        "http://localhost:8090/refill"
    );
}

#[test]
fn partial_config_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILENAME);
    fs::write(
        &path,
        r#"(base_url: "https://refill.example.com/api", log_destination: Both, log_level: "debug")"#,
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.base_url, "https://refill.example.com/api");
    assert_eq!(config.log_destination, LogDestination::Both);
    assert_eq!(config.level_filter(), LevelFilter::Debug);
    assert_eq!(config.state_dir, PathBuf::from(".refill"));
    assert_eq!(config.client_settings().request_timeout, Duration::from_secs(120));
}

#[test]
fn malformed_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILENAME);
    fs::write(&path, "(base_url: ").unwrap();

    assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
}

#[test]
fn api_url_override_wins_when_non_empty() {
    let config = AppConfig::default().with_api_url_override(Some(" http://svc:9000 ".to_string()));
    assert_eq!(config.base_url, "http://svc:9000");

    let config = AppConfig::default().with_api_url_override(Some("  ".to_string()));
    assert_eq!(config.base_url, "http://localhost:8090");
}

#[test]
fn unknown_log_level_falls_back_to_info() {
    let config = AppConfig {
        log_level: "chatty".to_string(),
        ..AppConfig::default()
    };
    assert_eq!(config.level_filter(), LevelFilter::Info);
}

#[test]
fn opened_session_persists_instructions_to_state_dir() {
    let temp = TempDir::new().unwrap();
    let config = AppConfig {
        state_dir: temp.path().join("state"),
        ..AppConfig::default()
    };

    let mut session = FormSession::open(&config);
    session.dispatch(Msg::InstructionsChanged("keep it short".to_string()));
    drop(session);

    let store = FileStore::new(config.state_dir.clone());
    assert_eq!(
        store.get(slots::INSTRUCTIONS).unwrap().as_deref(),
        Some("keep it short")
    );
    let reopened = FormSession::open(&config);
    assert_eq!(reopened.view().instructions, "keep it short");
}

#[test]
fn logging_can_be_initialized_more_than_once() {
    initialize_logging(LogDestination::Terminal, LevelFilter::Info);
    initialize_logging(LogDestination::Terminal, LevelFilter::Debug);
    log::info!("logger still usable");
}

#[test]
fn zero_request_timeout_falls_back_to_default() {
    let config = AppConfig {
        request_timeout_secs: 0,
        ..AppConfig::default()
    };
    assert_eq!(config.client_settings().request_timeout, Duration::from_secs(120));

    let config = AppConfig {
        request_timeout_secs: 30,
        ..AppConfig::default()
    };
    assert_eq!(config.client_settings().request_timeout, Duration::from_secs(30));
}
