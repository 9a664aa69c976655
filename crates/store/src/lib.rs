//! Task store and persistence for the questa application.
//!
//! # Overview
//!
//! - [`store`]: The [`TaskStore`], which runs every task operation
//! - [`gateway`]: The [`Gateway`] trait the store persists through
//! - [`json`]: JSON files with atomic writes, quarantine and backups
//! - [`memory`]: An in-memory gateway
//! - [`streak`]: Pluggable streak strategies
//! - [`query`]: Filtering, ordering and counts
//! - [`report`]: Deletion safety reports
//! - [`error`]: Error types
//!
//! # Examples
//!
//! ```no_run
//! use questa_config::Config;
//! use questa_protocol::{Difficulty, Priority};
//! use questa_store::{JsonFileGateway, TaskStore, streak};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let gateway = JsonFileGateway::new(config.resolve_data_dir()?)?
//!     .with_max_backups(config.backups.max_backups);
//! let mut store = TaskStore::open(gateway)?
//!     .with_streak_policy(streak::policy_for(&config.streak));
//!
//! let task = store.create("Fix bug", Difficulty::Medium, Priority::High, None)?;
//! let done = store.complete(task.id)?;
//! println!("+{} XP, level {}", done.xp_awarded, store.player().level());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gateway;
pub mod json;
pub mod memory;
pub mod query;
pub mod report;
pub mod store;
pub mod streak;

// Re-export primary types at crate root for convenience
pub use error::{Operation, PersistenceError, Result, StoreError};
pub use gateway::{Gateway, Loaded, SCHEMA_VERSION, TaskMap};
pub use json::JsonFileGateway;
pub use memory::MemoryGateway;
pub use query::{SortKey, StatusCounts, TaskQuery};
pub use report::{DeletionSafety, SafetyLevel};
pub use store::{BulkOutcome, Completion, TaskStore};
pub use streak::StreakPolicy;
