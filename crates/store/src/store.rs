//! The task store.
//!
//! [`TaskStore`] owns the in-memory task collection and the player's progress
//! for one session. Every mutating operation validates first, changes memory
//! second and writes through the [`Gateway`] last, so a rejected operation
//! never leaves a partial change behind.
//!
//! When a write fails the new state stays in memory, the store is marked as
//! not durable and the operation returns [`StoreError::Persistence`]. Until a
//! later write succeeds, every operation saves both files so that disk
//! catches up as soon as storage recovers. [`TaskStore::flush`] retries
//! explicitly.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use questa_protocol::{
    Difficulty, LevelChange, PlayerProgress, Priority, Task, TaskId, TaskStatus, TaskUpdate,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Operation, PersistenceError, Result, StoreError};
use crate::gateway::{Gateway, TaskMap};
use crate::query::{self, StatusCounts, TaskQuery};
use crate::report::DeletionSafety;
use crate::streak::{PerCompletion, StreakPolicy};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The result of completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The task as it is now.
    pub task: Task,
    /// XP added to the player's total.
    pub xp_awarded: u64,
    /// The player's level before and after.
    pub level: LevelChange,
}

/// The result of a bulk status change.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    /// Tasks that were moved.
    pub updated: Vec<Task>,
    /// Ids that could not be moved, with the reason.
    pub failed: Vec<(TaskId, StoreError)>,
}

impl BulkOutcome {
    /// Returns `true` if every id was moved.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Manages tasks and player progress on top of a [`Gateway`].
///
/// # Examples
///
/// ```
/// use questa_protocol::{Difficulty, Priority, TaskStatus};
/// use questa_store::{MemoryGateway, TaskStore};
///
/// # fn example() -> questa_store::Result<()> {
/// let mut store = TaskStore::open(MemoryGateway::new())?;
///
/// let task = store.create("Fix bug", Difficulty::Medium, Priority::High, None)?;
/// assert_eq!(task.status, TaskStatus::Pending);
/// assert_eq!(task.xp_reward, 30);
///
/// let done = store.complete(task.id)?;
/// assert_eq!(done.xp_awarded, 30);
/// assert_eq!(store.player().total_xp(), 30);
/// assert!(store.complete(task.id).is_err());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct TaskStore<G: Gateway> {
    gateway: G,
    tasks: TaskMap,
    player: PlayerProgress,
    streak: Box<dyn StreakPolicy>,
    clock: Clock,
    durable: bool,
    recovered: Vec<PersistenceError>,
}

impl<G: Gateway + fmt::Debug> fmt::Debug for TaskStore<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("gateway", &self.gateway)
            .field("tasks", &self.tasks.len())
            .field("player", &self.player)
            .field("streak", &self.streak)
            .field("durable", &self.durable)
            .finish_non_exhaustive()
    }
}

impl<G: Gateway> TaskStore<G> {
    /// Loads tasks and player progress from `gateway`.
    ///
    /// Corrupt data does not fail the open: the store starts empty and the
    /// recovery reports are available from [`TaskStore::recovered`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the storage cannot be accessed.
    #[instrument(skip_all)]
    pub fn open(gateway: G) -> Result<Self> {
        let persistence = |source| StoreError::Persistence {
            operation: Operation::Open,
            source,
        };
        let tasks = gateway.load_tasks().map_err(persistence)?;
        let player = gateway.load_player_progress().map_err(persistence)?;

        let recovered: Vec<PersistenceError> =
            [tasks.recovered, player.recovered].into_iter().flatten().collect();
        for report in &recovered {
            warn!(%report, "recovered from unreadable data");
        }
        info!(
            tasks = tasks.value.len(),
            level = player.value.level(),
            "store opened"
        );

        Ok(Self {
            gateway,
            tasks: tasks.value,
            player: player.value,
            streak: Box::new(PerCompletion),
            clock: Box::new(Utc::now),
            durable: true,
            recovered,
        })
    }

    /// Replaces the streak policy.
    #[must_use]
    pub fn with_streak_policy(mut self, policy: Box<dyn StreakPolicy>) -> Self {
        self.streak = policy;
        self
    }

    /// Replaces the source of timestamps used for creation and completion.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Problems found and repaired while opening.
    #[must_use]
    pub fn recovered(&self) -> &[PersistenceError] {
        &self.recovered
    }

    /// The underlying gateway.
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The player's progress.
    pub const fn player(&self) -> &PlayerProgress {
        &self.player
    }

    /// Returns `false` while memory holds changes that failed to save.
    pub const fn is_durable(&self) -> bool {
        self.durable
    }

    /// Creates a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank or oversized title or
    /// oversized notes, and [`StoreError::Persistence`] if the task was kept
    /// in memory but could not be saved.
    #[instrument(skip(self, title, notes))]
    pub fn create(
        &mut self,
        title: impl AsRef<str>,
        difficulty: Difficulty,
        priority: Priority,
        notes: Option<String>,
    ) -> Result<Task> {
        let task = Task::new_at(title, difficulty, priority, notes, (self.clock)())
            .map_err(|e| StoreError::rejected(Operation::Create, None, e))?;
        debug!(id = %task.id, "task created");
        self.tasks.insert(task.id, task.clone());
        self.persist_tasks(Operation::Create)?;
        Ok(task)
    }

    /// Returns tasks newest first, optionally only those with `status`.
    #[must_use]
    pub fn get(&self, status: Option<TaskStatus>) -> Vec<Task> {
        let mut query = TaskQuery::newest_first();
        query.status = status;
        self.query(&query)
    }

    /// Returns the tasks selected by `query`.
    #[must_use]
    pub fn query(&self, query: &TaskQuery) -> Vec<Task> {
        query.run(self.tasks.values())
    }

    /// Looks up one task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no such task.
    pub fn get_task(&self, id: TaskId) -> Result<&Task> {
        self.tasks.get(&id).ok_or(StoreError::NotFound {
            operation: Operation::Get,
            id,
        })
    }

    /// Returns tasks whose title or notes contain `text`, ignoring case,
    /// newest first. A blank query matches nothing.
    #[must_use]
    pub fn search(&self, text: &str) -> Vec<Task> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        TaskQuery::newest_first().run(self.tasks.values().filter(|t| query::mentions(t, &needle)))
    }

    /// Number of tasks per status.
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(self.tasks.values())
    }

    /// Edits a task.
    ///
    /// An update that moves the task into `Completed` awards XP exactly like
    /// [`TaskStore::complete`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id,
    /// [`StoreError::Validation`] for malformed values,
    /// [`StoreError::State`] for a status or difficulty change on a completed
    /// task or an illegal status move, and [`StoreError::Persistence`] if the
    /// change could not be saved.
    #[instrument(skip(self, update))]
    pub fn update(&mut self, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        let now = (self.clock)();
        let task = self.task_mut(Operation::Update, id)?;
        let completed = task
            .apply(update, now)
            .map_err(|e| StoreError::rejected(Operation::Update, Some(id), e))?;
        let task = task.clone();

        if completed {
            self.award(&task, now);
            self.persist_all(Operation::Update)?;
        } else {
            debug!(%id, "task updated");
            self.persist_tasks(Operation::Update)?;
        }
        Ok(task)
    }

    /// Completes a task and awards its XP.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id,
    /// [`StoreError::State`] if the task is already completed, and
    /// [`StoreError::Persistence`] if the award could not be saved. A
    /// rejected completion awards nothing.
    pub fn complete(&mut self, id: TaskId) -> Result<Completion> {
        self.complete_as(Operation::Complete, id)
    }

    /// Moves a task to `status`, following the transition table.
    ///
    /// A legal move into `Completed` behaves exactly like
    /// [`TaskStore::complete`]; `Blocked` cannot move there directly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id,
    /// [`StoreError::State`] for a move the table does not list (including
    /// a move to the current status), and [`StoreError::Persistence`] if the
    /// change could not be saved.
    #[instrument(skip(self))]
    pub fn set_status(&mut self, id: TaskId, status: TaskStatus) -> Result<Task> {
        if status == TaskStatus::Completed {
            let current = self.task_mut(Operation::SetStatus, id)?.status;
            if current != TaskStatus::Completed {
                current
                    .check_transition(status)
                    .map_err(|e| StoreError::rejected(Operation::SetStatus, Some(id), e))?;
            }
            return self
                .complete_as(Operation::SetStatus, id)
                .map(|completion| completion.task);
        }

        let now = (self.clock)();
        let task = self.task_mut(Operation::SetStatus, id)?;
        task.transition(status, now)
            .map_err(|e| StoreError::rejected(Operation::SetStatus, Some(id), e))?;
        let task = task.clone();
        debug!(%id, %status, "status changed");

        self.persist_tasks(Operation::SetStatus)?;
        Ok(task)
    }

    /// Moves several tasks to `status`.
    ///
    /// Each id is handled on its own; a failure is recorded and the rest
    /// carry on. A task that moved but could not be saved is reported as
    /// failed with [`StoreError::Persistence`] even though memory holds the
    /// move.
    pub fn bulk_set_status(&mut self, ids: &[TaskId], status: TaskStatus) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for &id in ids {
            match self.set_status(id, status) {
                Ok(task) => outcome.updated.push(task),
                Err(e) => outcome.failed.push((id, e)),
            }
        }
        info!(
            updated = outcome.updated.len(),
            failed = outcome.failed.len(),
            %status,
            "bulk status change"
        );
        outcome
    }

    /// Deletes a task for good.
    ///
    /// The player's XP and completion count are never reduced, whatever the
    /// task's status was.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Persistence`] if the removal could not be saved.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: TaskId) -> Result<bool> {
        let removed = self.tasks.remove(&id).ok_or(StoreError::NotFound {
            operation: Operation::Delete,
            id,
        })?;
        info!(%id, status = %removed.status, "task deleted");
        self.persist_tasks(Operation::Delete)?;
        Ok(true)
    }

    /// Reports what would be lost by deleting a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn deletion_safety(&self, id: TaskId) -> Result<DeletionSafety> {
        self.tasks
            .get(&id)
            .map(DeletionSafety::assess)
            .ok_or(StoreError::NotFound {
                operation: Operation::Delete,
                id,
            })
    }

    /// Asks the gateway to back up the stored data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the backup failed.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        self.gateway
            .backup()
            .map_err(|source| StoreError::Persistence {
                operation: Operation::Backup,
                source,
            })
    }

    /// Writes tasks and player progress again.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if either write failed.
    pub fn flush(&mut self) -> Result<()> {
        self.persist_all(Operation::Flush)
    }

    fn task_mut(&mut self, operation: Operation, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .get_mut(&id)
            .ok_or(StoreError::NotFound { operation, id })
    }

    #[instrument(skip(self))]
    fn complete_as(&mut self, operation: Operation, id: TaskId) -> Result<Completion> {
        let now = (self.clock)();
        let task = self.task_mut(operation, id)?;
        let xp_awarded = task
            .complete(now)
            .map_err(|e| StoreError::rejected(operation, Some(id), e))?;
        let task = task.clone();

        let level = self.award(&task, now);
        self.persist_all(operation)?;
        Ok(Completion {
            task,
            xp_awarded,
            level,
        })
    }

    /// Credits the player for a task that has just been completed.
    fn award(&mut self, task: &Task, at: DateTime<Utc>) -> LevelChange {
        let streak = self.streak.next_streak(&self.player, at);
        let change = self
            .player
            .record_completion(task.xp_reward, task.difficulty, streak, at);

        info!(
            id = %task.id,
            xp = task.xp_reward,
            total_xp = self.player.total_xp(),
            streak,
            "task completed"
        );
        if change.is_level_up() {
            info!(from = change.from, to = change.to, "level up");
        }
        change
    }

    fn persist_tasks(&mut self, operation: Operation) -> Result<()> {
        if !self.durable {
            return self.persist_all(operation);
        }
        let result = self.gateway.save_tasks(&self.tasks);
        self.settle(operation, result)
    }

    /// Saves tasks, then player progress.
    ///
    /// Tasks go first: if the second write fails the completed task is on
    /// disk without its award, which cannot lead to the award being paid
    /// twice.
    fn persist_all(&mut self, operation: Operation) -> Result<()> {
        let result = self
            .gateway
            .save_tasks(&self.tasks)
            .and_then(|()| self.gateway.save_player_progress(&self.player));
        let outcome = self.settle(operation, result);
        if outcome.is_ok() {
            self.durable = true;
        }
        outcome
    }

    fn settle(
        &mut self,
        operation: Operation,
        result: std::result::Result<(), PersistenceError>,
    ) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(source) => {
                warn!(%operation, error = %source, "change kept in memory but not saved");
                self.durable = false;
                Err(StoreError::Persistence { operation, source })
            }
        }
    }
}
