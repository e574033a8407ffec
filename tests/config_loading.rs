//! Loading hub settings from files and the environment.

use statehub::prelude::*;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_yaml_file_configures_subject() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hub.yaml");
    fs::write(
        &path,
        r#"
failure_policy: propagate
catch_panics: false
history_capacity: 16
"#,
    )
    .unwrap();

    let config = HubConfig::loader().with_file(&path).load().unwrap();
    assert_eq!(config.failure_policy, FailurePolicy::Propagate);
    assert!(!config.catch_panics);
    assert_eq!(config.history_capacity, 16);

    let subject = Subject::builder().with_config(config).build(0.0_f64).unwrap();
    assert_eq!(subject.config().failure_policy, FailurePolicy::Propagate);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hub.toml");
    fs::write(&path, "history_capacity = 3\n").unwrap();

    let config = HubConfig::loader().with_file(&path).load().unwrap();
    assert_eq!(config.failure_policy, FailurePolicy::Isolate);
    assert!(config.catch_panics);
    assert_eq!(config.history_capacity, 3);
}

#[test]
fn test_oversized_history_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hub.json");
    fs::write(&path, r#"{ "history_capacity": 5000000 }"#).unwrap();

    let result = HubConfig::loader().with_file(&path).load();
    assert!(matches!(result, Err(HubError::InvalidConfig(_))));
}

#[test]
#[allow(unsafe_code)] // For env var manipulation in tests
fn test_env_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hub.yaml");
    fs::write(&path, "failure_policy: isolate\nhistory_capacity: 2\n").unwrap();

    unsafe {
        env::set_var("STATEHUB_TEST_FAILURE_POLICY", "propagate");
        env::set_var("STATEHUB_TEST_HISTORY_CAPACITY", "7");
    }

    let result = HubConfig::loader()
        .with_file(&path)
        .with_env_overrides("STATEHUB_TEST", "__")
        .load();

    unsafe {
        env::remove_var("STATEHUB_TEST_FAILURE_POLICY");
        env::remove_var("STATEHUB_TEST_HISTORY_CAPACITY");
    }

    let config = result.unwrap();
    assert_eq!(config.failure_policy, FailurePolicy::Propagate);
    assert_eq!(config.history_capacity, 7);
}
