//! Task-related types for the quest log.
//!
//! This module defines the task identifier, the [`Task`] entity with its
//! lifecycle rules, and [`TaskUpdate`], the closed set of edits a caller can
//! make to an existing task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::vocabulary::{Difficulty, Priority, TaskStatus};

/// Unique identifier for a task.
///
/// Uses UUID v4 for globally unique identification.
pub type TaskId = uuid::Uuid;

/// Maximum title length, in characters, after trimming.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum notes length, in characters, after trimming.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// A quest: one unit of work that pays out XP when completed.
///
/// The `id` and `created_at` fields are set once by [`Task::new`]. The
/// `xp_reward` always equals the difficulty's base reward until the task is
/// completed, after which it is frozen together with the status.
///
/// # Examples
///
/// ```
/// use questa_protocol::{Difficulty, Priority, Task, TaskStatus};
///
/// let task = Task::new("Fix bug", Difficulty::Medium, Priority::High, None).unwrap();
/// assert_eq!(task.status, TaskStatus::Pending);
/// assert_eq!(task.xp_reward, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: TaskId,
    /// Short summary of the task.
    pub title: String,
    /// How hard the task is.
    pub difficulty: Difficulty,
    /// How urgent the task is.
    pub priority: Priority,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// XP paid out on completion.
    pub xp_reward: u64,
    /// When this task was created.
    pub created_at: DateTime<Utc>,
    /// When this task was completed, if it has been.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new pending task.
    ///
    /// The title is trimmed; blank notes are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidField`] if the title is blank or too
    /// long, or if the notes are too long.
    pub fn new(
        title: impl AsRef<str>,
        difficulty: Difficulty,
        priority: Priority,
        notes: Option<String>,
    ) -> Result<Self> {
        Self::new_at(title, difficulty, priority, notes, Utc::now())
    }

    /// Creates a new pending task stamped with `created_at`.
    ///
    /// # Errors
    ///
    /// Same as [`Task::new`].
    pub fn new_at(
        title: impl AsRef<str>,
        difficulty: Difficulty,
        priority: Priority,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            id: TaskId::new_v4(),
            title: normalize_title(title.as_ref())?,
            difficulty,
            priority,
            status: TaskStatus::Pending,
            notes: normalize_notes(notes)?,
            xp_reward: difficulty.base_reward(),
            created_at,
            completed_at: None,
        })
    }

    /// Returns `true` once the task has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Checks the entity invariants.
    ///
    /// Used on data coming back from storage, where nothing guarantees the
    /// record went through [`Task::new`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidField`] naming the first broken rule.
    pub fn validate(&self) -> Result<()> {
        if normalize_title(&self.title)? != self.title {
            return Err(ProtocolError::invalid("title", "has surrounding whitespace"));
        }
        if let Some(notes) = &self.notes {
            check_notes_length(notes)?;
        }
        match (self.is_completed(), self.completed_at) {
            (true, None) => {
                return Err(ProtocolError::invalid(
                    "completed_at",
                    "missing on a completed task",
                ));
            }
            (false, Some(_)) => {
                return Err(ProtocolError::invalid(
                    "completed_at",
                    "set on a task that is not completed",
                ));
            }
            _ => {}
        }
        if !self.is_completed() && self.xp_reward != self.difficulty.base_reward() {
            return Err(ProtocolError::invalid(
                "xp_reward",
                format!(
                    "{} does not match {} difficulty",
                    self.xp_reward, self.difficulty
                ),
            ));
        }
        Ok(())
    }

    /// Moves the task to `next`, following the status transition table.
    ///
    /// Moving into `Completed` stamps `completed_at` with `at`. XP bookkeeping
    /// is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AlreadyCompleted`] if the task is completed and
    /// `next` is `Completed`, or [`ProtocolError::IllegalTransition`] for any
    /// other move the table does not list.
    pub fn transition(&mut self, next: TaskStatus, at: DateTime<Utc>) -> Result<()> {
        if self.is_completed() && next == TaskStatus::Completed {
            return Err(ProtocolError::AlreadyCompleted);
        }
        self.status.check_transition(next)?;
        if next == TaskStatus::Completed {
            self.completed_at = Some(at);
        }
        self.status = next;
        Ok(())
    }

    /// Marks the task completed and returns the XP it pays out.
    ///
    /// Completion works from any open status, `Blocked` included; only the
    /// terminal state is rejected. Use [`Task::transition`] when the move
    /// must follow the status table.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AlreadyCompleted`] if the task is already
    /// completed.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use questa_protocol::{Difficulty, Priority, Task};
    ///
    /// let mut task = Task::new("Ship it", Difficulty::Hard, Priority::Low, None).unwrap();
    /// assert_eq!(task.complete(Utc::now()).unwrap(), 50);
    /// assert!(task.complete(Utc::now()).is_err());
    /// ```
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<u64> {
        if self.is_completed() {
            return Err(ProtocolError::AlreadyCompleted);
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
        Ok(self.xp_reward)
    }

    /// Applies an update, all or nothing.
    ///
    /// Returns `true` if the update moved the task into `Completed`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed values, and a state error for
    /// status or difficulty changes on a completed task or for a status move
    /// the transition table does not list. On error the task is unchanged.
    pub fn apply(&mut self, update: &TaskUpdate, at: DateTime<Utc>) -> Result<bool> {
        let mut next = self.clone();

        if let Some(title) = &update.title {
            next.title = normalize_title(title)?;
        }
        if let Some(notes) = &update.notes {
            next.notes = normalize_notes(notes.clone())?;
        }
        if let Some(priority) = update.priority {
            next.priority = priority;
        }
        if let Some(difficulty) = update.difficulty.filter(|d| *d != self.difficulty) {
            if self.is_completed() {
                return Err(ProtocolError::FrozenField {
                    field: "difficulty",
                });
            }
            next.difficulty = difficulty;
            next.xp_reward = difficulty.base_reward();
        }

        let mut completed = false;
        if let Some(status) = update.status.filter(|s| *s != self.status) {
            if self.is_completed() {
                return Err(ProtocolError::FrozenField { field: "status" });
            }
            next.transition(status, at)?;
            completed = next.is_completed();
        }

        *self = next;
        Ok(completed)
    }
}

/// The closed set of edits that can be made to an existing task.
///
/// Fields left as `None` are untouched. For `notes`, `Some(None)` clears them.
/// `id`, `created_at`, `xp_reward` and `completed_at` have no counterpart
/// here and can never be edited directly.
///
/// # Examples
///
/// ```
/// use questa_protocol::{Difficulty, TaskUpdate};
///
/// let update = TaskUpdate::default()
///     .with_title("Refactor parser")
///     .with_difficulty(Difficulty::Hard);
/// assert!(!update.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New title.
    pub title: Option<String>,
    /// New difficulty.
    pub difficulty: Option<Difficulty>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

impl TaskUpdate {
    /// Sets the new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the new difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Sets the new priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the new status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets (or, with `None`, clears) the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Returns `true` if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Builds an update from raw `(field, value)` text pairs.
    ///
    /// Field names are matched case-insensitively. An empty `notes` value
    /// clears the notes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ImmutableField`] for `id`, `created_at`,
    /// `xp_reward` and `completed_at`, [`ProtocolError::UnknownField`] for
    /// names that are not task fields, and [`ProtocolError::UnknownValue`] for
    /// unparseable enum values.
    ///
    /// # Examples
    ///
    /// ```
    /// use questa_protocol::{Priority, TaskUpdate};
    ///
    /// let update = TaskUpdate::from_fields([("priority", "critical")]).unwrap();
    /// assert_eq!(update.priority, Some(Priority::Critical));
    ///
    /// assert!(TaskUpdate::from_fields([("id", "abc")]).is_err());
    /// ```
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut update = Self::default();
        for (name, value) in fields {
            match name.trim().to_ascii_lowercase().as_str() {
                "title" => update.title = Some(value.to_string()),
                "difficulty" => update.difficulty = Some(value.parse()?),
                "priority" => update.priority = Some(value.parse()?),
                "status" => update.status = Some(value.parse()?),
                "notes" => update.notes = Some(Some(value.to_string())),
                "id" | "created_at" | "xp_reward" | "completed_at" => {
                    return Err(ProtocolError::ImmutableField {
                        field: name.to_string(),
                    });
                }
                _ => {
                    return Err(ProtocolError::UnknownField {
                        field: name.to_string(),
                    });
                }
            }
        }
        Ok(update)
    }
}

fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ProtocolError::invalid("title", "cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ProtocolError::invalid(
            "title",
            format!("cannot exceed {MAX_TITLE_LENGTH} characters"),
        ));
    }
    Ok(title.to_string())
}

fn normalize_notes(notes: Option<String>) -> Result<Option<String>> {
    let Some(notes) = notes else {
        return Ok(None);
    };
    let notes = notes.trim();
    if notes.is_empty() {
        return Ok(None);
    }
    check_notes_length(notes)?;
    Ok(Some(notes.to_string()))
}

fn check_notes_length(notes: &str) -> Result<()> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(ProtocolError::invalid(
            "notes",
            format!("cannot exceed {MAX_NOTES_LENGTH} characters"),
        ));
    }
    Ok(())
}
