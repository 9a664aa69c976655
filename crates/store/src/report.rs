//! Advisory reports about tasks.

use std::fmt;

use questa_protocol::{Difficulty, Task, TaskStatus};

/// How risky it is to delete a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SafetyLevel {
    /// Nothing worth warning about.
    Safe,
    /// Something the user may want to double-check.
    Caution,
    /// Earned XP or in-flight work is attached to the task.
    Danger,
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Danger => "danger",
        })
    }
}

/// The outcome of a deletion check.
///
/// The report never blocks a deletion; it is up to the caller to ask for
/// confirmation or take a backup first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionSafety {
    /// Overall level, the most severe of the warnings.
    pub level: SafetyLevel,
    /// One line per concern, most severe first.
    pub warnings: Vec<String>,
}

impl DeletionSafety {
    /// Inspects `task`.
    #[must_use]
    pub fn assess(task: &Task) -> Self {
        let mut findings: Vec<(SafetyLevel, String)> = Vec::new();

        if task.status == TaskStatus::Completed {
            findings.push((
                SafetyLevel::Danger,
                format!(
                    "task is completed; its {} XP stays earned but the record is lost",
                    task.xp_reward
                ),
            ));
        }
        if task.status == TaskStatus::Active {
            findings.push((SafetyLevel::Danger, "task is in progress".to_string()));
        }
        if task.priority.is_urgent() {
            findings.push((
                SafetyLevel::Caution,
                format!("task has {} priority", task.priority),
            ));
        }
        if task.difficulty == Difficulty::Hard && !task.is_completed() {
            findings.push((SafetyLevel::Caution, "task is a hard quest".to_string()));
        }

        findings.sort_by(|a, b| b.0.cmp(&a.0));
        Self {
            level: findings
                .first()
                .map_or(SafetyLevel::Safe, |(level, _)| *level),
            warnings: findings.into_iter().map(|(_, warning)| warning).collect(),
        }
    }

    /// Returns `true` when there is nothing to warn about.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.level == SafetyLevel::Safe
    }
}
