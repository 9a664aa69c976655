//! The persistence boundary.
//!
//! A [`Gateway`] owns the durable copy of the task collection and of the
//! player's progress. It never touches the store's in-memory state: the store
//! hands it complete snapshots to write and receives fresh values on load.
//!
//! Two implementations ship with the crate:
//!
//! - [`JsonFileGateway`](crate::JsonFileGateway): JSON files with atomic
//!   temp-file-then-rename writes and corrupt-file quarantine
//! - [`MemoryGateway`](crate::MemoryGateway): keeps everything in memory,
//!   for tests and embedding

use std::collections::BTreeMap;
use std::path::PathBuf;

use questa_protocol::{PlayerProgress, Task, TaskId};

use crate::error::PersistenceError;

/// The task collection, keyed and ordered by id.
pub type TaskMap = BTreeMap<TaskId, Task>;

/// Version written into every data file.
pub const SCHEMA_VERSION: &str = "1.0";

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// The outcome of a load.
///
/// When the stored data was unusable, `value` holds the empty default and
/// `recovered` explains what happened to the bad data.
#[derive(Debug)]
pub struct Loaded<T> {
    /// The loaded (or default) value.
    pub value: T,
    /// Set when corrupt data was moved aside and replaced by the default.
    pub recovered: Option<PersistenceError>,
}

impl<T> Loaded<T> {
    /// Wraps a cleanly loaded value.
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            recovered: None,
        }
    }

    /// Returns `true` if the load had to fall back to defaults.
    #[must_use]
    pub const fn was_recovered(&self) -> bool {
        self.recovered.is_some()
    }
}

/// Durable storage for tasks and player progress.
pub trait Gateway {
    /// Loads the task collection.
    ///
    /// A missing store yields an empty collection. Corrupt data yields an
    /// empty collection plus a [`PersistenceError::Corrupt`] report.
    ///
    /// # Errors
    ///
    /// Returns an error only when the storage itself cannot be accessed.
    fn load_tasks(&self) -> Result<Loaded<TaskMap>>;

    /// Replaces the stored task collection, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection could not be written. The previous
    /// content is then still intact.
    fn save_tasks(&self, tasks: &TaskMap) -> Result<()>;

    /// Loads the player's progress, with the same fallback rules as
    /// [`Gateway::load_tasks`].
    ///
    /// # Errors
    ///
    /// Returns an error only when the storage itself cannot be accessed.
    fn load_player_progress(&self) -> Result<Loaded<PlayerProgress>>;

    /// Replaces the stored player progress, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn save_player_progress(&self, player: &PlayerProgress) -> Result<()>;

    /// Copies the current stored data to a new backup.
    ///
    /// Returns where the backup went, or `None` if there was nothing to copy
    /// or the backend has no location to report.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy failed.
    fn backup(&self) -> Result<Option<PathBuf>>;
}

impl<G: Gateway + ?Sized> Gateway for &G {
    fn load_tasks(&self) -> Result<Loaded<TaskMap>> {
        (**self).load_tasks()
    }

    fn save_tasks(&self, tasks: &TaskMap) -> Result<()> {
        (**self).save_tasks(tasks)
    }

    fn load_player_progress(&self) -> Result<Loaded<PlayerProgress>> {
        (**self).load_player_progress()
    }

    fn save_player_progress(&self, player: &PlayerProgress) -> Result<()> {
        (**self).save_player_progress(player)
    }

    fn backup(&self) -> Result<Option<PathBuf>> {
        (**self).backup()
    }
}
