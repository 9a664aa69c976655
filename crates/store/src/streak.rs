//! Streak strategies.
//!
//! The store asks a [`StreakPolicy`] for the new streak value each time a
//! task is completed. Which policy runs is chosen by [`StreakConfig`].

use std::fmt::Debug;

use chrono::{DateTime, Duration, Utc};
use questa_config::StreakConfig;
use questa_protocol::PlayerProgress;

/// Computes the streak after a completion.
pub trait StreakPolicy: Debug + Send + Sync {
    /// Returns the streak to record for a completion at `at`.
    ///
    /// `player` is the record before the completion is applied.
    fn next_streak(&self, player: &PlayerProgress, at: DateTime<Utc>) -> u32;
}

/// Every completion extends the streak.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerCompletion;

impl StreakPolicy for PerCompletion {
    fn next_streak(&self, player: &PlayerProgress, _at: DateTime<Utc>) -> u32 {
        player.current_streak().saturating_add(1)
    }
}

/// Counts consecutive UTC calendar days with at least one completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarDay;

impl StreakPolicy for CalendarDay {
    fn next_streak(&self, player: &PlayerProgress, at: DateTime<Utc>) -> u32 {
        let Some(last) = player.last_activity() else {
            return 1;
        };
        let today = at.date_naive();
        let last_day = last.date_naive();

        if last_day == today {
            player.current_streak().max(1)
        } else if last_day.succ_opt() == Some(today) {
            player.current_streak().saturating_add(1)
        } else {
            1
        }
    }
}

/// Keeps the streak alive while completions are at most `window` apart.
#[derive(Debug, Clone, Copy)]
pub struct RollingWindow {
    window: Duration,
}

impl RollingWindow {
    /// Creates a policy with a window of `hours`.
    #[must_use]
    pub fn hours(hours: u32) -> Self {
        Self {
            window: Duration::hours(i64::from(hours)),
        }
    }
}

impl StreakPolicy for RollingWindow {
    fn next_streak(&self, player: &PlayerProgress, at: DateTime<Utc>) -> u32 {
        match player.last_activity() {
            Some(last) if at.signed_duration_since(last) <= self.window => {
                player.current_streak().saturating_add(1)
            }
            _ => 1,
        }
    }
}

/// Builds the policy selected by `config`.
#[must_use]
pub fn policy_for(config: &StreakConfig) -> Box<dyn StreakPolicy> {
    match *config {
        StreakConfig::PerCompletion => Box::new(PerCompletion),
        StreakConfig::CalendarDay => Box::new(CalendarDay),
        StreakConfig::RollingWindow { hours } => Box::new(RollingWindow::hours(hours)),
    }
}
