//! Configuration loading from files and environment overrides

mod common;

use common::*;
use std::io::Write;
use std::time::Duration;
use tasker_chain::config::ConfigManager;
use tasker_chain::{task_on, ChainConfig, ChainError, Dispatcher, Step};

#[test]
fn test_yaml_file_configures_dispatcher() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"
executors:
  queue_capacity: 8
  async:
    thread_name_prefix: "configured-async"
dispatch_loop:
  dispatch_interval_ms: 25
logging:
  json: true
"#
    )
    .unwrap();

    let manager = ConfigManager::load_from_path(file.path()).unwrap();
    let config = manager.config();
    assert_eq!(config.executors.queue_capacity, 8);
    assert_eq!(config.executors.strand_capacity, ChainConfig::default().executors.strand_capacity);
    assert_eq!(config.dispatch_loop.interval(), Duration::from_millis(25));
    assert!(config.logging.json);
    assert_eq!(manager.source(), Some(file.path()));

    let dispatcher = Dispatcher::from_manager(&manager);
    let name = task_on(AsyncLane, Step::new(|| {
        std::thread::current().name().unwrap_or_default().to_string()
    }))
    .submit_future(&dispatcher)
    .wait()
    .unwrap();
    assert!(name.starts_with("configured-async-"));
}

#[test]
fn test_toml_file_is_supported() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[dispatch_loop]
dispatch_interval_ms = 5
thread_name_prefix = "toml-driver"
"#
    )
    .unwrap();

    let manager = ConfigManager::load_from_path(file.path()).unwrap();
    assert_eq!(manager.config().dispatch_loop.dispatch_interval_ms, 5);
    assert_eq!(manager.config().dispatch_loop.thread_name_prefix, "toml-driver");
}

#[test]
fn test_invalid_file_values_rejected() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "dispatch_loop:\n  dispatch_interval_ms: 0").unwrap();

    let result = ConfigManager::load_from_path(file.path());
    assert!(matches!(result, Err(ChainError::Configuration(_))));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigManager::load_from_path(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ChainError::Configuration(_))));
}

#[test]
fn test_environment_overrides_nested_keys() {
    std::env::set_var(
        "TASKER_CHAIN_CFGTEST_DISPATCH_LOOP__DISPATCH_INTERVAL_MS",
        "40",
    );
    std::env::set_var("TASKER_CHAIN_CFGTEST_EXECUTORS__STRAND_CAPACITY", "3");

    let manager = ConfigManager::load_from(None, "TASKER_CHAIN_CFGTEST").unwrap();
    assert_eq!(manager.config().dispatch_loop.dispatch_interval_ms, 40);
    assert_eq!(manager.config().executors.strand_capacity, 3);

    std::env::remove_var("TASKER_CHAIN_CFGTEST_DISPATCH_LOOP__DISPATCH_INTERVAL_MS");
    std::env::remove_var("TASKER_CHAIN_CFGTEST_EXECUTORS__STRAND_CAPACITY");
}
