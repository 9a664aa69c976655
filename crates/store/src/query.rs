//! Task queries: filtering, ordering and text search.

use std::cmp::Ordering;

use questa_protocol::{Difficulty, Priority, Task, TaskStatus};
use serde::Serialize;

/// The field tasks are ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Title, ignoring case.
    Title,
    /// Difficulty, easiest first.
    Difficulty,
    /// Priority, lowest first.
    Priority,
    /// Status, in lifecycle order.
    Status,
}

/// Which tasks to return and in what order.
///
/// Filters left as `None` match every task. Ties are broken by id so that
/// results are stable.
///
/// # Examples
///
/// ```
/// use questa_protocol::{Priority, TaskStatus};
/// use questa_store::{SortKey, TaskQuery};
///
/// let query = TaskQuery::default()
///     .with_status(TaskStatus::Pending)
///     .with_priority(Priority::High)
///     .sorted_by(SortKey::Title, false);
/// assert_eq!(query.sort, SortKey::Title);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Only tasks with this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this difficulty.
    pub difficulty: Option<Difficulty>,
    /// Only tasks with this priority.
    pub priority: Option<Priority>,
    /// Sort field.
    pub sort: SortKey,
    /// Reverse the order.
    pub descending: bool,
}

impl TaskQuery {
    /// The default listing: every task, newest first.
    #[must_use]
    pub fn newest_first() -> Self {
        Self {
            descending: true,
            ..Self::default()
        }
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one difficulty.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Restricts to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortKey, descending: bool) -> Self {
        self.sort = sort;
        self.descending = descending;
        self
    }

    /// Returns `true` if `task` passes every filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.difficulty.is_none_or(|d| task.difficulty == d)
            && self.priority.is_none_or(|p| task.priority == p)
    }

    /// Compares two tasks under this query's ordering.
    #[must_use]
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let primary = match self.sort {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Difficulty => a.difficulty.cmp(&b.difficulty),
            SortKey::Priority => a.priority.cmp(&b.priority),
            SortKey::Status => a.status.cmp(&b.status),
        };
        let ordering = primary.then_with(|| a.id.cmp(&b.id));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Filters and sorts `tasks`.
    pub fn run<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Vec<Task> {
        let mut result: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect();
        result.sort_by(|a, b| self.compare(a, b));
        result
    }
}

/// Returns `true` if `needle` (already lowercased) occurs in the title or
/// notes of `task`, ignoring case.
pub(crate) fn mentions(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(needle))
}

/// Number of tasks per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Pending tasks.
    pub pending: usize,
    /// Active tasks.
    pub active: usize,
    /// Blocked tasks.
    pub blocked: usize,
    /// Completed tasks.
    pub completed: usize,
}

impl StatusCounts {
    /// Tallies `tasks` by status.
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            let slot = match task.status {
                TaskStatus::Pending => &mut counts.pending,
                TaskStatus::Active => &mut counts.active,
                TaskStatus::Blocked => &mut counts.blocked,
                TaskStatus::Completed => &mut counts.completed,
            };
            *slot += 1;
        }
        counts
    }

    /// Returns the count for one status.
    #[must_use]
    pub const fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::Active => self.active,
            TaskStatus::Blocked => self.blocked,
            TaskStatus::Completed => self.completed,
        }
    }

    /// Total number of tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.active + self.blocked + self.completed
    }
}
