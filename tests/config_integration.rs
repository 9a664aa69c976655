//! Integration tests for the questa-config crate.

use std::fs;
use std::path::PathBuf;

use questa_config::{BackupConfig, Config, ConfigError, StreakConfig};
use tempfile::TempDir;

#[test]
fn config_load_from_json5_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("questa.json5");

    fs::write(
        &config_path,
        r#"
        {
            // Configuration for questa
            data_dir: "/srv/quests",
            streak: {
                policy: "rolling_window",
                hours: 36,
            },
            backups: { max_backups: 3 },
        }
        "#,
    )
    .unwrap();

    let config = Config::load_from(&config_path).unwrap();

    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/quests")));
    assert_eq!(config.streak, StreakConfig::RollingWindow { hours: 36 });
    assert_eq!(config.backups.max_backups, 3);
}

#[test]
fn config_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("questa.json5");
    fs::write(&config_path, r#"{ streak: { policy: "calendar_day" } }"#).unwrap();

    let config = Config::load_from(&config_path).unwrap();

    assert!(config.data_dir.is_none());
    assert_eq!(config.streak, StreakConfig::CalendarDay);
    assert_eq!(config.backups, BackupConfig::default());
}

#[test]
fn config_plain_json_file_loads() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("questa.json");

    let original = Config {
        data_dir: Some(dir.path().join("data")),
        streak: StreakConfig::RollingWindow { hours: 12 },
        backups: BackupConfig { max_backups: 7 },
    };

    fs::write(&config_path, serde_json::to_string_pretty(&original).unwrap()).unwrap();
    let loaded = Config::load_from(&config_path).unwrap();

    assert_eq!(original, loaded);
}

#[test]
fn config_load_nonexistent_fails() {
    let result = Config::load_from("/nonexistent/path/config.json");
    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[test]
fn config_load_malformed_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("questa.json5");
    fs::write(&config_path, "{ streak: ").unwrap();

    assert!(Config::load_from(&config_path).is_err());
}

#[test]
fn streak_window_validation() {
    assert!(StreakConfig::RollingWindow { hours: 1 }.validate().is_ok());
    assert!(StreakConfig::RollingWindow { hours: 168 }.validate().is_ok());
    assert!(StreakConfig::RollingWindow { hours: 0 }.validate().is_err());
    assert!(StreakConfig::RollingWindow { hours: 169 }.validate().is_err());
}

#[test]
fn config_validation() {
    let valid = Config {
        data_dir: None,
        streak: StreakConfig::CalendarDay,
        backups: BackupConfig { max_backups: 1 },
    };
    assert!(valid.validate().is_ok());

    let invalid = Config {
        backups: BackupConfig { max_backups: 0 },
        ..Default::default()
    };
    assert!(matches!(
        invalid.validate(),
        Err(ConfigError::InvalidBackupRetention { .. })
    ));
}

#[test]
fn streak_config_serialization() {
    let json = serde_json::to_string(&StreakConfig::RollingWindow { hours: 24 }).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["policy"], "rolling_window");
    assert_eq!(parsed["hours"], 24);

    let json = serde_json::to_string(&StreakConfig::PerCompletion).unwrap();
    assert_eq!(json, r#"{"policy":"per_completion"}"#);
}

#[test]
fn env_override_replaces_data_dir() {
    let mut config = Config {
        data_dir: Some(PathBuf::from("/from/file")),
        ..Default::default()
    };
    config.apply_env(|key| (key == questa_config::DATA_DIR_ENV).then(|| "/from/env".to_string()));

    assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/from/env"));
}
