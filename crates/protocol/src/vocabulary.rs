//! The fixed vocabulary used to describe tasks.
//!
//! This module defines the three closed value sets attached to every task:
//! [`Difficulty`] (which carries the base XP reward), [`Priority`] (purely
//! descriptive) and [`TaskStatus`] (which owns the status transition table).
//!
//! All three serialize as upper-case tags (`"EASY"`, `"CRITICAL"`,
//! `"COMPLETED"`, ...) and parse case-insensitively from either the tag or the
//! display name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// How hard a task is, and therefore how much XP it is worth.
///
/// # Examples
///
/// ```
/// use questa_protocol::Difficulty;
///
/// assert_eq!(Difficulty::Medium.base_reward(), 30);
/// assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    /// Quick wins.
    #[default]
    Easy,
    /// A solid chunk of work.
    Medium,
    /// Something that takes real effort.
    Hard,
}

/// Base XP per difficulty, in declaration order.
const BASE_REWARDS: [(Difficulty, u64); 3] = [
    (Difficulty::Easy, 15),
    (Difficulty::Medium, 30),
    (Difficulty::Hard, 50),
];

impl Difficulty {
    /// Returns all difficulties from easiest to hardest.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Easy, Self::Medium, Self::Hard]
    }

    /// Returns the fixed base XP reward bound to this difficulty.
    ///
    /// # Examples
    ///
    /// ```
    /// use questa_protocol::Difficulty;
    ///
    /// assert_eq!(Difficulty::Easy.base_reward(), 15);
    /// assert_eq!(Difficulty::Hard.base_reward(), 50);
    /// ```
    #[must_use]
    pub const fn base_reward(self) -> u64 {
        BASE_REWARDS[self as usize].1
    }

    /// Returns a human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// How urgent a task is.
///
/// Priority is descriptive only; it never changes the XP a task awards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Whenever there is time.
    Low,
    /// The normal case.
    #[default]
    Medium,
    /// Should be done soon.
    High,
    /// Drop everything else.
    Critical,
}

impl Priority {
    /// Returns all priorities from lowest to highest.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    /// Returns a human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Returns `true` for `High` and `Critical`.
    #[must_use]
    pub const fn is_urgent(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

/// Where a task is in its lifecycle.
///
/// New tasks start as [`TaskStatus::Pending`]. The allowed moves are:
///
/// | From      | To                           |
/// |-----------|------------------------------|
/// | Pending   | Active, Blocked, Completed   |
/// | Active    | Pending, Blocked, Completed  |
/// | Blocked   | Pending, Active              |
/// | Completed | (terminal)                   |
///
/// # Examples
///
/// ```
/// use questa_protocol::TaskStatus;
///
/// assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Active));
/// assert!(!TaskStatus::Blocked.can_transition_to(TaskStatus::Completed));
/// assert!(TaskStatus::Completed.is_terminal());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Being worked on.
    Active,
    /// Waiting on something else.
    Blocked,
    /// Done; XP has been awarded.
    Completed,
}

impl TaskStatus {
    /// Returns all statuses in lifecycle order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Pending, Self::Active, Self::Blocked, Self::Completed]
    }

    /// Returns a human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Blocked => "Blocked",
            Self::Completed => "Completed",
        }
    }

    /// Returns the statuses reachable from this one in a single move.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Active, Self::Blocked, Self::Completed],
            Self::Active => &[Self::Pending, Self::Blocked, Self::Completed],
            Self::Blocked => &[Self::Pending, Self::Active],
            Self::Completed => &[],
        }
    }

    /// Returns `true` if moving from `self` to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Checks a move against the transition table.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::IllegalTransition`] if the move is not listed.
    pub fn check_transition(self, next: Self) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(ProtocolError::IllegalTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Returns `true` for the terminal `Completed` status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

macro_rules! vocabulary_text {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.display_name())
            }
        }

        impl FromStr for $ty {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                Self::all()
                    .into_iter()
                    .find(|v| v.display_name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ProtocolError::UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

vocabulary_text!(Difficulty, "difficulty");
vocabulary_text!(Priority, "priority");
vocabulary_text!(TaskStatus, "status");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rewards_are_fixed() {
        assert_eq!(Difficulty::Easy.base_reward(), 15);
        assert_eq!(Difficulty::Medium.base_reward(), 30);
        assert_eq!(Difficulty::Hard.base_reward(), 50);
    }

    #[test]
    fn base_reward_table_matches_declaration_order() {
        for (idx, (difficulty, _)) in BASE_REWARDS.iter().enumerate() {
            assert_eq!(*difficulty as usize, idx);
        }
    }

    #[test]
    fn transition_table() {
        use TaskStatus::*;

        let allowed = [
            (Pending, Active),
            (Pending, Blocked),
            (Pending, Completed),
            (Active, Pending),
            (Active, Blocked),
            (Active, Completed),
            (Blocked, Pending),
            (Blocked, Active),
        ];

        for from in TaskStatus::all() {
            for to in TaskStatus::all() {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {}",
                    if expected { "allowed" } else { "rejected" }
                );
                assert_eq!(from.check_transition(to).is_ok(), expected);
            }
        }
    }

    #[test]
    fn completed_is_terminal() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Completed.allowed_transitions().is_empty());
        assert!(!TaskStatus::Pending.is_terminal());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" critical ".parse::<Priority>().unwrap(), Priority::Critical);
        assert_eq!("Blocked".parse::<TaskStatus>().unwrap(), TaskStatus::Blocked);
    }

    #[test]
    fn parse_unknown_value_fails() {
        let err = "extreme".parse::<Difficulty>().unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"unknown difficulty `extreme`");
        assert!(!err.is_state_error());
    }

    #[test]
    fn json_tags_are_upper_case() {
        let json = serde_json::to_string(&Priority::Critical).expect("serialize");
        assert_eq!(json, r#""CRITICAL""#);

        let json = serde_json::to_string(&TaskStatus::Completed).expect("serialize");
        assert_eq!(json, r#""COMPLETED""#);

        let parsed: Difficulty = serde_json::from_str(r#""MEDIUM""#).expect("deserialize");
        assert_eq!(parsed, Difficulty::Medium);
    }

    #[test]
    fn defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn urgent_priorities() {
        assert!(!Priority::Low.is_urgent());
        assert!(!Priority::Medium.is_urgent());
        assert!(Priority::High.is_urgent());
        assert!(Priority::Critical.is_urgent());
    }
}
