//! Tests for loading configuration from YAML files

use patient::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(yaml.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_load_full_config_file() {
    let file = write_config(
        r#"
server:
  host: 0.0.0.0
  port: 9000
validation:
  allowed_email_domains:
    - hdfc.com
    - axis.com
  email_storage: full
"#,
    );

    let config = AppConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.bind_address(), "0.0.0.0:9000");
    assert_eq!(config.validation.allowed_email_domains, vec!["hdfc.com", "axis.com"]);
    assert_eq!(config.validation.email_storage, EmailStorage::Full);
}

#[test]
fn test_empty_file_yields_defaults() {
    let file = write_config("{}\n");
    let config = AppConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_invalid_storage_value() {
    let file = write_config("validation:\n  email_storage: local_part\n");
    let err = AppConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_errors_surface_as_500() {
    let err = AppConfig::from_yaml_str("server:\n  port: 0\n").unwrap_err();
    let err = ServiceError::from(err);
    assert_eq!(
        err.status_code(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_schema_built_from_file_rules() {
    let file = write_config("validation:\n  allowed_email_domains: [axis.com]\n");
    let config = AppConfig::from_yaml_file(file.path()).unwrap();
    let schema = patient_schema(&config.validation);

    let raw = serde_json::json!({
        "name": "Ana",
        "age": 41,
        "email": "ana@AXIS.com",
        "address": { "city": "Mumbai", "pin_code": "400001" },
        "height": 1.6,
        "weight": 55,
        "allergies": []
    });
    let patient = Patient::construct_with(&schema, &raw).unwrap();
    assert_eq!(patient.email, "axis.com");
}
