//! Config file discovery and reading.
//!
//! Config files may be JSON5 (`.json5`, comments and trailing commas allowed)
//! or plain JSON.
//!
//! # File Locations
//!
//! Searched in this order:
//!
//! 1. Working directory: `./questa.json5`, then `./questa.json`
//! 2. User config directory: `<config_dir>/questa/config.json5`, then
//!    `<config_dir>/questa/config.json`

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Config file names looked up in the working directory.
const LOCAL_FILE_NAMES: &[&str] = &["questa.json5", "questa.json"];

/// Application directory name under the platform config/data directories.
const APP_DIR: &str = "questa";

/// Config file names looked up in the user config directory.
const USER_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Returns the first config file that exists, if any.
///
/// # Examples
///
/// ```no_run
/// use questa_config::persistence::find_config_file;
///
/// match find_config_file() {
///     Some(path) => println!("using {}", path.display()),
///     None => println!("using defaults"),
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let local = LOCAL_FILE_NAMES.iter().map(PathBuf::from);
    let user = dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .into_iter()
        .flat_map(|dir| USER_FILE_NAMES.iter().map(move |name| dir.join(name)));

    local.chain(user).find(|path| path.exists())
}

/// Returns the default directory for tasks and player data,
/// e.g. `~/.local/share/questa/` on Linux.
///
/// # Errors
///
/// Returns an error if the platform data directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoDataDirectory)
}

/// Reads and parses a JSON5 or JSON config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    // JSON is a subset of JSON5, so one parser covers both
    serde_json5::from_str(&content).map_err(ConfigError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Sample {
        name: String,
        value: i32,
    }

    #[test]
    fn read_json5_with_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questa.json5");
        std::fs::write(
            &path,
            r#"
            {
                // where the quests live
                name: "quests",
                value: 7,
            }
            "#,
        )
        .unwrap();

        let sample: Sample = read_config_file(&path).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "quests".to_string(),
                value: 7
            }
        );
    }

    #[test]
    fn read_missing_file_reports_path() {
        let result: Result<Sample> = read_config_file("/nonexistent/questa.json");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
        assert!(err.to_string().contains("/nonexistent/questa.json"));
    }

    #[test]
    fn read_invalid_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ name: ").unwrap();

        let result: Result<Sample> = read_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseJson5(_))));
    }

    #[test]
    fn data_dir_ends_with_app_dir() {
        // Skipped where the platform has no home directory
        if dirs::data_dir().is_some() {
            assert!(default_data_dir().unwrap().ends_with(APP_DIR));
        }
    }
}
