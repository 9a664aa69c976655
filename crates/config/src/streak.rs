//! Streak policy configuration.
//!
//! This module provides the [`StreakConfig`] type which selects how the
//! player's streak is counted. What "consecutive" means is a product choice,
//! so it is configurable:
//!
//! - `per_completion`: every completion extends the streak (the default)
//! - `calendar_day`: the streak counts consecutive UTC calendar days with at
//!   least one completion
//! - `rolling_window`: the streak continues while completions are less than
//!   `hours` apart
//!
//! # Examples
//!
//! ```
//! use questa_config::StreakConfig;
//!
//! let config: StreakConfig = serde_json::from_str(r#"{"policy": "calendar_day"}"#).unwrap();
//! assert_eq!(config, StreakConfig::CalendarDay);
//!
//! let config: StreakConfig =
//!     serde_json::from_str(r#"{"policy": "rolling_window", "hours": 36}"#).unwrap();
//! assert_eq!(config, StreakConfig::RollingWindow { hours: 36 });
//! ```

use serde::{Deserialize, Serialize};

/// Default window for the rolling-window policy (one day).
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

/// Minimum allowed window (1 hour).
pub const MIN_WINDOW_HOURS: u32 = 1;

/// Maximum allowed window (1 week).
pub const MAX_WINDOW_HOURS: u32 = 168;

/// How the player's streak is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum StreakConfig {
    /// Every completion adds one to the streak.
    #[default]
    PerCompletion,
    /// Consecutive calendar days (UTC) with at least one completion.
    CalendarDay,
    /// Completions no more than `hours` apart keep the streak alive.
    RollingWindow {
        /// Maximum gap between two completions, in hours.
        #[serde(default = "default_window_hours")]
        hours: u32,
    },
}

fn default_window_hours() -> u32 {
    DEFAULT_WINDOW_HOURS
}

impl StreakConfig {
    /// Validates the streak configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a rolling window is outside the allowed range.
    pub fn validate(&self) -> crate::Result<()> {
        let Self::RollingWindow { hours } = *self else {
            return Ok(());
        };

        if hours < MIN_WINDOW_HOURS {
            return Err(crate::ConfigError::InvalidStreakWindow {
                reason: format!("window {hours} is below minimum of {MIN_WINDOW_HOURS} hours"),
            });
        }

        if hours > MAX_WINDOW_HOURS {
            return Err(crate::ConfigError::InvalidStreakWindow {
                reason: format!("window {hours} exceeds maximum of {MAX_WINDOW_HOURS} hours"),
            });
        }

        Ok(())
    }
}
