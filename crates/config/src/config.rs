//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the questa application.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backup::BackupConfig;
use crate::error::Result;
use crate::persistence::{default_data_dir, find_config_file, read_config_file};
use crate::streak::StreakConfig;

/// Environment variable that overrides [`Config::data_dir`].
pub const DATA_DIR_ENV: &str = "QUESTA_DATA_DIR";

/// The main configuration struct for the questa application.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use questa_config::{BackupConfig, Config, StreakConfig};
///
/// let config = Config::default();
/// assert!(config.data_dir.is_none());
///
/// let config = Config {
///     data_dir: Some(PathBuf::from("/tmp/quests")),
///     streak: StreakConfig::CalendarDay,
///     backups: BackupConfig { max_backups: 3 },
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `tasks.json`, `player.json` and backups.
    ///
    /// Falls back to the platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// How the player's streak is counted.
    #[serde(default)]
    pub streak: StreakConfig,

    /// Backup retention.
    #[serde(default)]
    pub backups: BackupConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations, then applies
    /// environment overrides.
    ///
    /// If no configuration file is found, the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read, parsed or validated.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use questa_config::Config;
    ///
    /// # fn example() -> questa_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("data in {}", config.resolve_data_dir()?.display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        let mut config: Self = match find_config_file() {
            Some(path) => read_config_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// Only [`DATA_DIR_ENV`] is recognized; empty values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use questa_config::Config;
    ///
    /// let mut config = Config::default();
    /// config.apply_env(|key| (key == "QUESTA_DATA_DIR").then(|| "/srv/quests".to_string()));
    /// assert_eq!(config.data_dir, Some(PathBuf::from("/srv/quests")));
    /// ```
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Returns the data directory, falling back to the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the platform data
    /// directory cannot be determined.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any section is out of range.
    pub fn validate(&self) -> Result<()> {
        self.streak.validate()?;
        self.backups.validate()?;
        Ok(())
    }
}
