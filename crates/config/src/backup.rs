//! Backup retention configuration.

use serde::{Deserialize, Serialize};

/// Default number of backups kept.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// How many timestamped backups of the data files are kept.
///
/// # Examples
///
/// ```
/// use questa_config::BackupConfig;
///
/// let config = BackupConfig::default();
/// assert_eq!(config.max_backups, 10);
/// assert!(BackupConfig { max_backups: 0 }.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Backups beyond this count are pruned, oldest first.
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

fn default_max_backups() -> usize {
    DEFAULT_MAX_BACKUPS
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl BackupConfig {
    /// Validates the retention count.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_backups` is zero.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_backups == 0 {
            return Err(crate::ConfigError::InvalidBackupRetention {
                reason: "at least one backup must be kept".to_string(),
            });
        }
        Ok(())
    }
}
