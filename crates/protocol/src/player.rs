//! Cumulative player progress.
//!
//! [`PlayerProgress`] only ever grows: XP and completion counters are never
//! revoked, even when the task that earned them is deleted later. The level
//! is derived from `total_xp` on demand and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reward;
use crate::vocabulary::Difficulty;

/// Completion counts per difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCounts {
    /// Easy tasks completed.
    pub easy: u32,
    /// Medium tasks completed.
    pub medium: u32,
    /// Hard tasks completed.
    pub hard: u32,
}

impl DifficultyCounts {
    /// Returns the count for one difficulty.
    #[must_use]
    pub const fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn increment(&mut self, difficulty: Difficulty) {
        let slot = match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        };
        *slot = slot.saturating_add(1);
    }
}

/// The level before and after a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    /// Level before the XP was added.
    pub from: u32,
    /// Level after the XP was added.
    pub to: u32,
}

impl LevelChange {
    /// Returns `true` if the completion crossed at least one threshold.
    #[must_use]
    pub const fn is_level_up(&self) -> bool {
        self.to > self.from
    }
}

/// The player's cumulative record.
///
/// Fields are private so that the only way to change them is through
/// [`PlayerProgress::record_completion`].
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use questa_protocol::{Difficulty, PlayerProgress};
///
/// let mut player = PlayerProgress::default();
/// assert_eq!(player.level(), 1);
///
/// let change = player.record_completion(120, Difficulty::Hard, 1, Utc::now());
/// assert!(change.is_level_up());
/// assert_eq!(player.total_xp(), 120);
/// assert_eq!(player.tasks_completed(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerProgress {
    total_xp: u64,
    tasks_completed: u32,
    current_streak: u32,
    last_activity: Option<DateTime<Utc>>,
    completions: DifficultyCounts,
}

impl PlayerProgress {
    /// Rebuilds a record from previously persisted values.
    #[must_use]
    pub const fn restore(
        total_xp: u64,
        tasks_completed: u32,
        current_streak: u32,
        last_activity: Option<DateTime<Utc>>,
        completions: DifficultyCounts,
    ) -> Self {
        Self {
            total_xp,
            tasks_completed,
            current_streak,
            last_activity,
            completions,
        }
    }

    /// Total XP earned over the life of the record.
    #[must_use]
    pub const fn total_xp(&self) -> u64 {
        self.total_xp
    }

    /// Number of tasks completed.
    #[must_use]
    pub const fn tasks_completed(&self) -> u32 {
        self.tasks_completed
    }

    /// Current streak, as maintained by the configured streak policy.
    #[must_use]
    pub const fn current_streak(&self) -> u32 {
        self.current_streak
    }

    /// When the most recent completion happened.
    #[must_use]
    pub const fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }

    /// Completion counts per difficulty.
    #[must_use]
    pub const fn completions(&self) -> DifficultyCounts {
        self.completions
    }

    /// Current level, derived from `total_xp`.
    #[must_use]
    pub fn level(&self) -> u32 {
        reward::level(self.total_xp)
    }

    /// XP missing for the next level, or `None` at the maximum level.
    #[must_use]
    pub fn xp_to_next_level(&self) -> Option<u64> {
        reward::xp_to_next(self.total_xp)
    }

    /// Progress through the current level, from 0.0 to 1.0.
    #[must_use]
    pub fn level_progress(&self) -> f64 {
        reward::level_progress(self.total_xp)
    }

    /// Records one completed task.
    ///
    /// Adds `xp`, bumps the completion counters, sets the streak to
    /// `streak` and the last activity to `at`.
    pub fn record_completion(
        &mut self,
        xp: u64,
        difficulty: Difficulty,
        streak: u32,
        at: DateTime<Utc>,
    ) -> LevelChange {
        let from = self.level();
        self.total_xp = self.total_xp.saturating_add(xp);
        self.tasks_completed = self.tasks_completed.saturating_add(1);
        self.completions.increment(difficulty);
        self.current_streak = streak;
        self.last_activity = Some(at);
        LevelChange {
            from,
            to: self.level(),
        }
    }

    /// Returns a summary suitable for display.
    #[must_use]
    pub fn statistics(&self) -> PlayerStatistics {
        PlayerStatistics {
            level: self.level(),
            total_xp: self.total_xp,
            xp_to_next_level: self.xp_to_next_level(),
            level_progress: self.level_progress(),
            tasks_completed: self.tasks_completed,
            current_streak: self.current_streak,
            completions: self.completions,
            last_activity: self.last_activity,
        }
    }
}

/// A read-only snapshot of the player's numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatistics {
    /// Current level.
    pub level: u32,
    /// Total XP earned.
    pub total_xp: u64,
    /// XP missing for the next level.
    pub xp_to_next_level: Option<u64>,
    /// Progress through the current level.
    pub level_progress: f64,
    /// Number of tasks completed.
    pub tasks_completed: u32,
    /// Current streak.
    pub current_streak: u32,
    /// Completion counts per difficulty.
    pub completions: DifficultyCounts,
    /// Most recent completion.
    pub last_activity: Option<DateTime<Utc>>,
}
