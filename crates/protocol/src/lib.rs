//! Shared protocol types for the questa application.
//!
//! This crate defines the entities of the quest log and the rules that
//! protect them: the fixed vocabulary of difficulties, priorities and
//! statuses, the task state machine, the player's cumulative progress and
//! the reward/leveling calculator.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`vocabulary`]: Difficulty, priority and status values
//! - [`task`]: Task identifiers, the `Task` entity and `TaskUpdate`
//! - [`player`]: The `PlayerProgress` record
//! - [`reward`]: Base rewards and the level table
//! - [`error`]: Error types for entity operations
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use questa_protocol::{Difficulty, PlayerProgress, Priority, Task, TaskStatus};
//!
//! let mut task = Task::new("Fix bug", Difficulty::Medium, Priority::High, None).unwrap();
//! let mut player = PlayerProgress::default();
//!
//! task.transition(TaskStatus::Active, Utc::now()).unwrap();
//! let xp = task.complete(Utc::now()).unwrap();
//! player.record_completion(xp, task.difficulty, 1, Utc::now());
//!
//! assert_eq!(player.total_xp(), 30);
//! ```

pub mod error;
pub mod player;
pub mod reward;
pub mod task;
pub mod vocabulary;

// Re-export primary types at crate root for convenience
pub use error::{ProtocolError, Result};
pub use player::{DifficultyCounts, LevelChange, PlayerProgress, PlayerStatistics};
pub use task::{MAX_NOTES_LENGTH, MAX_TITLE_LENGTH, Task, TaskId, TaskUpdate};
pub use vocabulary::{Difficulty, Priority, TaskStatus};
