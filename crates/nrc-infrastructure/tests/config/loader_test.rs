//! Configuration Loader Tests

use nrc_domain::error::Error;
use nrc_infrastructure::config::loader::{to_toml, validate_app_config};
use nrc_infrastructure::config::{AppConfig, ClientSettings, ConfigBuilder, ConfigLoader};
use nrc_infrastructure::constants::{DEFAULT_LOG_LEVEL, DEFAULT_READ_TIMEOUT_MS};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_loader_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(temp_dir.path().join("absent.toml"))
        .with_env_prefix("NRC_TEST_ABSENT")
        .load()
        .unwrap();

    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.client_defaults.read_timeout_ms, DEFAULT_READ_TIMEOUT_MS);
    assert!(config.clients.is_empty());
    assert!(!config.retry.enabled);
}

#[test]
fn test_config_loader_reads_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nrc.toml");
    fs::write(
        &path,
        r#"
[client_defaults]
read_timeout_ms = 2500

[clients.users]
servers = ["users-1:8080", "users-2:8080"]
max_auto_retries = 2

[retry]
enabled = true

[properties]
"users.name" = "users"
"#,
    )
    .unwrap();

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("NRC_TEST_TOML");
    let config = loader.load().unwrap();

    assert_eq!(loader.config_path(), Some(path.as_path()));
    assert_eq!(config.client_defaults.read_timeout_ms, 2500);
    assert_eq!(config.clients["users"].servers.len(), 2);
    assert_eq!(config.clients["users"].max_auto_retries, Some(2));
    assert!(config.retry.enabled);
    assert_eq!(config.properties["users.name"], "users");
}

#[test]
fn test_config_loader_rejects_bad_server() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nrc.toml");
    fs::write(&path, "[clients.users]\nservers = [\"no-port\"]\n").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("NRC_TEST_BAD")
        .load()
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("users"));
}

#[test]
fn test_config_loader_rejects_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nrc.toml");
    fs::write(&path, "[client_defaults\nread_timeout_ms = ").unwrap();

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("NRC_TEST_INVALID")
        .load()
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_config_save_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.toml");
    let original = ConfigBuilder::new()
        .with_client("orders", ["orders:9000"])
        .with_property("orders.path", "/v2")
        .with_retry(true)
        .build();

    let loader = ConfigLoader::new().with_env_prefix("NRC_TEST_SAVE");
    loader.save_to_file(&original, &path).unwrap();
    let loaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("NRC_TEST_SAVE")
        .load()
        .unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn test_config_save_reports_target_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("saved.toml");

    let err = ConfigLoader::new()
        .save_to_file(&AppConfig::default(), &path)
        .unwrap_err();

    assert!(matches!(err, Error::Internal { .. }));
    assert!(err.to_string().contains("saved.toml"));
}

#[test]
fn test_validation_rules() {
    let mut config = AppConfig::default();
    assert!(validate_app_config(&config).is_ok());

    config.client_defaults.read_timeout_ms = 0;
    assert!(validate_app_config(&config).is_err());

    let config = ConfigBuilder::new()
        .with_client_settings(
            "users",
            ClientSettings {
                connect_timeout_ms: Some(0),
                ..ClientSettings::with_servers(["users:80"])
            },
        )
        .build();
    assert!(validate_app_config(&config).is_err());

    let config = ConfigBuilder::new()
        .with_client(" ", ["users:80"])
        .build();
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_to_toml_contains_clients() {
    let config = ConfigBuilder::new()
        .with_client("users", ["users-1:8080"])
        .build();
    let rendered = to_toml(&config).unwrap();

    assert!(rendered.contains("[clients.users]"));
    assert!(rendered.contains("users-1:8080"));
}
