use std::fs;
use std::path::Path;

use anyhow::Result;
use tenantctl_config::{BackoffStrategy, ConfigError, load_config, parse_config};

const VALID: &str = r#"{
    "serviceCredentials": {
        "username": "admin",
        "password": "secret",
        "url": "grafana.internal:3000"
    },
    "datasourceTemplate": {"type": "postgres", "access": "proxy", "url": "db:5432"},
    "provisioning": {"maxAttempts": 3, "backoff": "exponential", "maxBackoffMs": 4000}
}"#;

#[test]
fn loads_valid_file_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tenantctl.json");
    fs::write(&path, VALID)?;

    let config = load_config(&path)?;
    assert_eq!(config.service_credentials.username, "admin");
    assert_eq!(config.datasource_template.fields().len(), 3);
    assert_eq!(config.provisioning.max_attempts, 3);
    assert_eq!(config.provisioning.backoff, BackoffStrategy::Exponential);
    assert_eq!(config.provisioning.max_backoff_ms, 4000);
    Ok(())
}

#[test]
fn missing_file_reports_path() {
    let err = load_config(Path::new("/definitely/missing/tenantctl.json"))
        .expect_err("missing file must fail");
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/definitely/missing/tenantctl.json"));
}

#[test]
fn missing_template_is_a_parse_error() {
    let raw = r#"{"serviceCredentials": {"username": "a", "password": "b", "url": "svc"}}"#;
    let err = parse_config(Path::new("inline.json"), raw).expect_err("template is required");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn zero_attempts_fail_validation() {
    let raw = r#"{
        "serviceCredentials": {"username": "a", "password": "b", "url": "svc"},
        "datasourceTemplate": {},
        "provisioning": {"maxAttempts": 0}
    }"#;
    let err = parse_config(Path::new("inline.json"), raw).expect_err("zero attempts");
    assert!(matches!(
        err,
        ConfigError::InvalidField {
            field: "maxAttempts",
            ..
        }
    ));
}

#[test]
fn blank_username_fails_validation() {
    let raw = r#"{
        "serviceCredentials": {"username": " ", "password": "b", "url": "svc"},
        "datasourceTemplate": {}
    }"#;
    let err = parse_config(Path::new("inline.json"), raw).expect_err("blank username");
    assert!(matches!(
        err,
        ConfigError::InvalidField {
            field: "username",
            ..
        }
    ));
}
