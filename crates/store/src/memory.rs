//! In-memory gateway.

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use questa_protocol::PlayerProgress;

use crate::error::PersistenceError;
use crate::gateway::{Gateway, Loaded, Result, TaskMap};

#[derive(Debug, Default)]
struct State {
    tasks: TaskMap,
    player: PlayerProgress,
    fail_writes: bool,
    backups: usize,
}

/// Keeps tasks and player progress in memory.
///
/// Writes can be made to fail on demand with
/// [`MemoryGateway::set_fail_writes`], which is how the store's
/// failure handling is tested.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway holding the given data.
    #[must_use]
    pub fn with_data(tasks: TaskMap, player: PlayerProgress) -> Self {
        Self {
            state: Mutex::new(State {
                tasks,
                player,
                ..State::default()
            }),
        }
    }

    /// Makes every following save fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Returns a copy of the stored tasks.
    #[must_use]
    pub fn stored_tasks(&self) -> TaskMap {
        self.lock().tasks.clone()
    }

    /// Returns a copy of the stored player progress.
    #[must_use]
    pub fn stored_player(&self) -> PlayerProgress {
        self.lock().player.clone()
    }

    /// Number of backups taken so far.
    #[must_use]
    pub fn backup_count(&self) -> usize {
        self.lock().backups
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(state: &State, what: &str) -> Result<()> {
        if state.fail_writes {
            return Err(PersistenceError::Write {
                path: PathBuf::from(format!("memory:{what}")),
                source: io::Error::other("writes disabled"),
            });
        }
        Ok(())
    }
}

impl Gateway for MemoryGateway {
    fn load_tasks(&self) -> Result<Loaded<TaskMap>> {
        Ok(Loaded::clean(self.lock().tasks.clone()))
    }

    fn save_tasks(&self, tasks: &TaskMap) -> Result<()> {
        let mut state = self.lock();
        Self::check_writable(&state, "tasks")?;
        state.tasks = tasks.clone();
        Ok(())
    }

    fn load_player_progress(&self) -> Result<Loaded<PlayerProgress>> {
        Ok(Loaded::clean(self.lock().player.clone()))
    }

    fn save_player_progress(&self, player: &PlayerProgress) -> Result<()> {
        let mut state = self.lock();
        Self::check_writable(&state, "player")?;
        state.player = player.clone();
        Ok(())
    }

    fn backup(&self) -> Result<Option<PathBuf>> {
        let mut state = self.lock();
        Self::check_writable(&state, "backup")?;
        state.backups += 1;
        Ok(None)
    }
}
