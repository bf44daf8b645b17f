use super::*;
use tempfile::{tempdir, TempDir};
use std::fs::File;
use std::io::Write;

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

fn sample_config() -> Config {
    Config {
        database_url: "original.db".to_string(),
        host: "0.0.0.0".to_string(),
        port: 8080,
        max_upload_bytes: 1024,
        assets_dir: PathBuf::from("static"),
        log_dir: None,
        log_json: false,
    }
}

/// Tests for Config::apply_update
#[test]
fn test_apply_update_with_all_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        host: Some("10.0.0.1".to_string()),
        port: Some(9000),
        max_upload_bytes: Some(2048),
        assets_dir: Some(PathBuf::from("public")),
        log_dir: Some(PathBuf::from("/var/log/imageshare")),
        log_json: Some(true),
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.host, "10.0.0.1");
    assert_eq!(updated.port, 9000);
    assert_eq!(updated.max_upload_bytes, 2048);
    assert_eq!(updated.assets_dir, PathBuf::from("public"));
    assert_eq!(updated.log_dir, Some(PathBuf::from("/var/log/imageshare")));
    assert!(updated.log_json);
}

#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        port: Some(9000),
        ..ConfigUpdate::default()
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.port, 9000);
    assert_eq!(updated.database_url, "original.db"); // Unchanged
    assert_eq!(updated.host, "0.0.0.0"); // Unchanged
    assert_eq!(updated.max_upload_bytes, 1024); // Unchanged
}

#[test]
fn test_apply_update_with_no_values() {
    let updated = sample_config().apply_update(ConfigUpdate::default());

    assert_eq!(updated, sample_config());
}

#[test]
fn test_bind_address() {
    assert_eq!(sample_config().bind_address(), "0.0.0.0:8080");
}

/// Tests for base_config
#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "imageshare.db");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.max_upload_bytes, 500_000_000);
    assert_eq!(config.assets_dir, PathBuf::from("assets"));
    assert_eq!(config.log_dir, None);
    assert!(!config.log_json);
}

#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    // With a config path, the database lives next to the config file
    let expected_db_path = temp_dir.path().join("imageshare.db").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db_path);
    assert_eq!(config.port, 3000);
}

/// Tests for config_from_args
#[test]
fn test_config_from_args_with_values() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        port: Some(4000),
        log_json: Some(true),
        debug: true,
        ..CliArgs::default()
    };

    let update = config_from_args(&args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.port, Some(4000));
    assert_eq!(update.log_json, Some(true));
    assert_eq!(update.host, None);
    assert_eq!(update.assets_dir, None);
}

#[test]
fn test_config_from_args_with_no_values() {
    let update = config_from_args(&CliArgs::default());

    assert_eq!(update, ConfigUpdate::default());
}

#[test]
fn test_cli_args_parse_flags() {
    let args = CliArgs::try_parse_from([
        "imageshare",
        "--port",
        "4321",
        "--assets-dir",
        "public",
        "--debug",
    ])
    .unwrap();

    assert_eq!(args.port, Some(4321));
    assert_eq!(args.assets_dir, Some(PathBuf::from("public")));
    assert!(args.debug);
}

/// Tests for config_from_file - successful cases
#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();

    assert_eq!(update, ConfigUpdate::default());
}

#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        host = "0.0.0.0"
        port = 8000
        max_upload_bytes = 1000000
        assets_dir = "public"
        log_dir = "logs"
        log_json = true
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    let result = config_from_file(Some(config_path));

    assert!(result.is_ok(), "Failed to parse config file: {}", result.err().unwrap());
    let update = result.unwrap();
    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.host, Some("0.0.0.0".to_string()));
    assert_eq!(update.port, Some(8000));
    assert_eq!(update.max_upload_bytes, Some(1_000_000));
    assert_eq!(update.assets_dir, Some(PathBuf::from("public")));
    assert_eq!(update.log_dir, Some(PathBuf::from("logs")));
    assert_eq!(update.log_json, Some(true));
}

#[test]
fn test_config_from_file_with_partial_values() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        port = 8000
        # Intentionally missing other fields
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    let update = config_from_file(Some(config_path)).unwrap();

    assert_eq!(update.port, Some(8000));
    assert_eq!(update.database_url, None);
    assert_eq!(update.log_json, None);
}

/// Tests for config_from_file - failure cases
#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        port = "not a number" # Type error
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    assert!(config_from_file(Some(config_path)).is_err());
}

#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path)).unwrap();

    // Should return default values when file doesn't exist
    assert_eq!(update, ConfigUpdate::default());
}

/// Tests the layering order used by get_config
#[test]
fn test_config_precedence() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..CliArgs::default()
    };

    let file_config = ConfigUpdate {
        database_url: Some("file.db".to_string()),
        port: Some(5000),
        ..ConfigUpdate::default()
    };

    let config = base_config(None)
        .apply_update(file_config)
        .apply_update(config_from_args(&args));

    // Args override file values, which override base values
    assert_eq!(config.database_url, "args.db");
    assert_eq!(config.port, 5000); // From file
    assert_eq!(config.host, "127.0.0.1"); // From base
}
