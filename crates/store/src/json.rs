//! JSON file storage for tasks and player progress.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//! ├── tasks.json
//! ├── player.json
//! └── backups/
//!     └── {timestamp}/
//!         ├── tasks.json
//!         └── player.json
//! ```
//!
//! Every write goes to `<file>.tmp` in the same directory, is flushed to
//! disk, and is then renamed over the destination. A crash at any point
//! leaves either the old or the new file in place, never a truncated one.
//!
//! A file that exists but fails validation is renamed to
//! `<file>.corrupt-{timestamp}`, replaced by an empty default, and reported
//! through [`Loaded::recovered`].

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use questa_protocol::{DifficultyCounts, PlayerProgress, TaskId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::PersistenceError;
use crate::gateway::{Gateway, Loaded, Result, SCHEMA_VERSION, TaskMap};

/// Task file name inside the data directory.
pub const TASKS_FILE: &str = "tasks.json";

/// Player file name inside the data directory.
pub const PLAYER_FILE: &str = "player.json";

/// Backup directory name inside the data directory.
pub const BACKUP_DIR: &str = "backups";

/// Number of backups kept unless configured otherwise.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Timestamp format for backup and quarantine names; sorts chronologically.
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3fZ";

/// On-disk layout of `tasks.json`.
#[derive(Debug, Serialize, Deserialize)]
struct TasksDocument<T> {
    tasks: BTreeMap<String, T>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
}

/// On-disk layout of `player.json`.
#[derive(Debug, Serialize, Deserialize)]
struct PlayerDocument {
    player: PlayerRecord,
    #[serde(default)]
    statistics: StatisticsRecord,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlayerRecord {
    #[serde(default)]
    total_xp: u64,
    #[serde(default)]
    tasks_completed: u32,
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    last_activity: Option<DateTime<Utc>>,
}

/// Derived figures are written for readers of the file and ignored on load,
/// except the per-difficulty counts which only live here.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StatisticsRecord {
    #[serde(default)]
    easy_completed: u32,
    #[serde(default)]
    medium_completed: u32,
    #[serde(default)]
    hard_completed: u32,
    #[serde(default)]
    total_xp_earned: u64,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    xp_to_next_level: Option<u64>,
}

impl From<&PlayerProgress> for PlayerDocument {
    fn from(player: &PlayerProgress) -> Self {
        let counts = player.completions();
        Self {
            player: PlayerRecord {
                total_xp: player.total_xp(),
                tasks_completed: player.tasks_completed(),
                current_streak: player.current_streak(),
                last_activity: player.last_activity(),
            },
            statistics: StatisticsRecord {
                easy_completed: counts.easy,
                medium_completed: counts.medium,
                hard_completed: counts.hard,
                total_xp_earned: player.total_xp(),
                level: player.level(),
                xp_to_next_level: player.xp_to_next_level(),
            },
            version: Some(SCHEMA_VERSION.to_string()),
            last_modified: Some(Utc::now()),
        }
    }
}

impl From<PlayerDocument> for PlayerProgress {
    fn from(doc: PlayerDocument) -> Self {
        PlayerProgress::restore(
            doc.player.total_xp,
            doc.player.tasks_completed,
            doc.player.current_streak,
            doc.player.last_activity,
            DifficultyCounts {
                easy: doc.statistics.easy_completed,
                medium: doc.statistics.medium_completed,
                hard: doc.statistics.hard_completed,
            },
        )
    }
}

/// Stores tasks and player progress as JSON files in one directory.
///
/// # Examples
///
/// ```no_run
/// use questa_store::{Gateway, JsonFileGateway};
///
/// # fn example() -> Result<(), questa_store::PersistenceError> {
/// let gateway = JsonFileGateway::new("/tmp/questa")?;
/// let loaded = gateway.load_tasks()?;
/// if let Some(report) = &loaded.recovered {
///     eprintln!("warning: {report}");
/// }
/// println!("{} tasks", loaded.value.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    data_dir: PathBuf,
    max_backups: usize,
}

impl JsonFileGateway {
    /// Opens (and if needed creates) a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            debug!(?data_dir, "creating data directory");
            fs::create_dir_all(&data_dir).map_err(|source| PersistenceError::Write {
                path: data_dir.clone(),
                source,
            })?;
        }
        Ok(Self {
            data_dir,
            max_backups: DEFAULT_MAX_BACKUPS,
        })
    }

    /// Sets how many backups are kept; at least one always is.
    #[must_use]
    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups.max(1);
        self
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the task file.
    #[must_use]
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    /// Path of the player file.
    #[must_use]
    pub fn player_path(&self) -> PathBuf {
        self.data_dir.join(PLAYER_FILE)
    }

    /// Path of the backup directory.
    #[must_use]
    pub fn backups_path(&self) -> PathBuf {
        self.data_dir.join(BACKUP_DIR)
    }

    /// Reads `path` and decodes it, falling back to `default` when the file
    /// is missing or invalid.
    ///
    /// `decode` returns a reason string on structural problems.
    fn load_or_recover<T>(
        &self,
        path: &Path,
        decode: impl FnOnce(&[u8]) -> std::result::Result<T, String>,
        default: impl Fn() -> T,
        write_default: impl Fn(&Self, &T) -> Result<()>,
    ) -> Result<Loaded<T>> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(?path, "data file not found, creating default");
                let value = default();
                write_default(self, &value)?;
                return Ok(Loaded::clean(value));
            }
            Err(source) => {
                warn!(?path, error = %source, "failed to read data file");
                return Err(PersistenceError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        match decode(&content[..]) {
            Ok(value) => Ok(Loaded::clean(value)),
            Err(reason) => {
                let moved_to = quarantine(path)?;
                warn!(?path, ?moved_to, %reason, "data file is corrupt, moved aside");
                let value = default();
                write_default(self, &value)?;
                Ok(Loaded {
                    value,
                    recovered: Some(PersistenceError::Corrupt {
                        path: path.to_path_buf(),
                        moved_to,
                        reason,
                    }),
                })
            }
        }
    }

    /// Copies the data files into a new timestamped backup directory.
    ///
    /// Returns `None` if neither data file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup directory or a copy cannot be made.
    #[instrument(skip(self))]
    pub fn create_backup(&self) -> Result<Option<PathBuf>> {
        let sources: Vec<PathBuf> = [self.tasks_path(), self.player_path()]
            .into_iter()
            .filter(|p| p.exists())
            .collect();
        if sources.is_empty() {
            debug!("nothing to back up");
            return Ok(None);
        }

        let target = self
            .backups_path()
            .join(Utc::now().format(STAMP_FORMAT).to_string());
        let backup_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| PersistenceError::Backup { path, source }
        };

        fs::create_dir_all(&target).map_err(backup_err(&target))?;
        for source in &sources {
            let name = source.file_name().unwrap_or_default();
            fs::copy(source, target.join(name)).map_err(backup_err(source))?;
        }
        info!(?target, files = sources.len(), "backup created");

        self.prune_backups()?;
        Ok(Some(target))
    }

    /// Removes the oldest backups beyond the retention count.
    fn prune_backups(&self) -> Result<()> {
        let dir = self.backups_path();
        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::Backup {
            path: dir.clone(),
            source,
        })?;

        let mut backups: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(self.max_backups);
        for old in backups.into_iter().take(excess) {
            debug!(?old, "pruning backup");
            fs::remove_dir_all(&old).map_err(|source| PersistenceError::Backup {
                path: old.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl Gateway for JsonFileGateway {
    #[instrument(skip(self))]
    fn load_tasks(&self) -> Result<Loaded<TaskMap>> {
        let loaded = self.load_or_recover(
            &self.tasks_path(),
            decode_tasks,
            TaskMap::new,
            |gateway, tasks| gateway.save_tasks(tasks),
        )?;
        debug!(tasks = loaded.value.len(), "loaded tasks");
        Ok(loaded)
    }

    #[instrument(skip(self, tasks), fields(tasks = tasks.len()))]
    fn save_tasks(&self, tasks: &TaskMap) -> Result<()> {
        let document = TasksDocument {
            tasks: tasks
                .iter()
                .map(|(id, task)| (id.to_string(), task))
                .collect(),
            version: Some(SCHEMA_VERSION.to_string()),
            last_modified: Some(Utc::now()),
        };
        write_json(&self.tasks_path(), "tasks", &document)?;
        debug!("tasks saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn load_player_progress(&self) -> Result<Loaded<PlayerProgress>> {
        self.load_or_recover(
            &self.player_path(),
            decode_player,
            PlayerProgress::default,
            |gateway, player| gateway.save_player_progress(player),
        )
    }

    #[instrument(skip_all)]
    fn save_player_progress(&self, player: &PlayerProgress) -> Result<()> {
        write_json(&self.player_path(), "player", &PlayerDocument::from(player))?;
        debug!("player progress saved");
        Ok(())
    }

    fn backup(&self) -> Result<Option<PathBuf>> {
        self.create_backup()
    }
}

fn parse<T: DeserializeOwned>(content: &[u8]) -> std::result::Result<T, String> {
    serde_json::from_slice(content).map_err(|e| e.to_string())
}

fn note_migration(file: &str, version: Option<&str>) {
    if version != Some(SCHEMA_VERSION) {
        info!(
            file,
            from = version.unwrap_or("unversioned"),
            to = SCHEMA_VERSION,
            "migrating data file on next save"
        );
    }
}

fn decode_tasks(content: &[u8]) -> std::result::Result<TaskMap, String> {
    let document: TasksDocument<questa_protocol::Task> = parse(content)?;
    note_migration(TASKS_FILE, document.version.as_deref());

    let mut tasks = TaskMap::new();
    for (key, task) in document.tasks {
        if key.parse::<TaskId>().ok() != Some(task.id) {
            return Err(format!("task key {key} does not match its id {}", task.id));
        }
        task.validate()
            .map_err(|e| format!("task {}: {e}", task.id))?;
        tasks.insert(task.id, task);
    }
    Ok(tasks)
}

fn decode_player(content: &[u8]) -> std::result::Result<PlayerProgress, String> {
    let document: PlayerDocument = parse(content)?;
    note_migration(PLAYER_FILE, document.version.as_deref());
    Ok(document.into())
}

/// Renames a bad file out of the way and returns its new path.
fn quarantine(path: &Path) -> Result<PathBuf> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{}", Utc::now().format(STAMP_FORMAT)));
    let moved_to = path.with_file_name(name);

    fs::rename(path, &moved_to).map_err(|source| PersistenceError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(moved_to)
}

/// Returns the temp file used while writing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serializes `value` and writes it to `path` atomically.
fn write_json<T: Serialize>(path: &Path, what: &'static str, value: &T) -> Result<()> {
    let content = serde_json::to_vec_pretty(value)
        .map_err(|source| PersistenceError::Serialize { what, source })?;
    write_atomic(path, &content)
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let temp = temp_path(path);
    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&temp)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&temp, path)
    };

    write().map_err(|source| {
        // The destination is untouched; only the temp file may be left over
        let _ = fs::remove_file(&temp);
        PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use questa_protocol::{Difficulty, Priority, Task, TaskStatus};
    use tempfile::TempDir;

    fn create_test_gateway() -> (JsonFileGateway, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let gateway =
            JsonFileGateway::new(temp_dir.path()).expect("Failed to create gateway");
        (gateway, temp_dir)
    }

    fn sample_tasks() -> TaskMap {
        let mut done = Task::new("Ship release", Difficulty::Hard, Priority::Critical, None)
            .expect("valid task");
        done.complete(Utc::now()).expect("complete");
        let pending = Task::new(
            "Write changelog",
            Difficulty::Easy,
            Priority::Low,
            Some("mention the fixes".to_string()),
        )
        .expect("valid task");

        [done, pending].into_iter().map(|t| (t.id, t)).collect()
    }

    #[test]
    fn new_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("data");

        let gateway = JsonFileGateway::new(&dir).expect("create gateway");
        assert!(dir.is_dir());
        assert_eq!(gateway.data_dir(), dir);
    }

    #[test]
    fn load_missing_files_creates_defaults() {
        let (gateway, _temp) = create_test_gateway();

        let tasks = gateway.load_tasks().expect("load tasks");
        assert!(tasks.value.is_empty());
        assert!(!tasks.was_recovered());
        assert!(gateway.tasks_path().exists());

        let player = gateway.load_player_progress().expect("load player");
        assert_eq!(player.value, PlayerProgress::default());
        assert!(gateway.player_path().exists());

        let content = fs::read_to_string(gateway.tasks_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert!(value["tasks"].as_object().unwrap().is_empty());
        assert!(value["last_modified"].is_string());
    }

    #[test]
    fn save_and_load_tasks_roundtrip() {
        let (gateway, _temp) = create_test_gateway();
        let tasks = sample_tasks();

        gateway.save_tasks(&tasks).expect("save");
        let loaded = gateway.load_tasks().expect("load");

        assert!(!loaded.was_recovered());
        assert_eq!(loaded.value, tasks);
    }

    #[test]
    fn save_and_load_player_roundtrip() {
        let (gateway, _temp) = create_test_gateway();
        let mut player = PlayerProgress::default();
        player.record_completion(50, Difficulty::Hard, 1, Utc::now());
        player.record_completion(15, Difficulty::Easy, 2, Utc::now());

        gateway.save_player_progress(&player).expect("save");
        let loaded = gateway.load_player_progress().expect("load");

        assert_eq!(loaded.value, player);
    }

    #[test]
    fn player_file_layout() {
        let (gateway, _temp) = create_test_gateway();
        let mut player = PlayerProgress::default();
        player.record_completion(120, Difficulty::Hard, 1, Utc::now());
        gateway.save_player_progress(&player).expect("save");

        let content = fs::read_to_string(gateway.player_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["player"]["total_xp"], 120);
        assert_eq!(value["player"]["tasks_completed"], 1);
        assert_eq!(value["statistics"]["hard_completed"], 1);
        assert_eq!(value["statistics"]["total_xp_earned"], 120);
        assert_eq!(value["statistics"]["level"], 2);
        assert_eq!(value["version"], SCHEMA_VERSION);
    }

    #[test]
    fn task_file_layout() {
        let (gateway, _temp) = create_test_gateway();
        let tasks = sample_tasks();
        gateway.save_tasks(&tasks).expect("save");

        let content = fs::read_to_string(gateway.tasks_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        for (id, task) in &tasks {
            let record = &value["tasks"][id.to_string()];
            assert_eq!(record["id"], id.to_string());
            assert_eq!(record["title"], task.title.as_str());
            assert_eq!(record["xp_reward"], task.xp_reward);
        }
    }

    #[test]
    fn invalid_utf8_is_quarantined() {
        let (gateway, _temp) = create_test_gateway();
        let garbage = [0xff, 0xfe, b'{', 0x80];
        fs::write(gateway.tasks_path(), garbage).unwrap();

        let loaded = gateway.load_tasks().expect("recoverable");

        assert!(loaded.value.is_empty());
        let Some(PersistenceError::Corrupt { moved_to, .. }) = loaded.recovered else {
            panic!("expected a corruption report");
        };
        assert_eq!(fs::read(&moved_to).unwrap(), garbage);
        assert!(!gateway.load_tasks().unwrap().was_recovered());
    }

    #[test]
    fn malformed_json_is_quarantined() {
        let (gateway, temp) = create_test_gateway();
        fs::write(gateway.tasks_path(), "{ not json").unwrap();

        let loaded = gateway.load_tasks().expect("recoverable");

        assert!(loaded.value.is_empty());
        let Some(PersistenceError::Corrupt { moved_to, .. }) = loaded.recovered else {
            panic!("expected a corruption report");
        };
        assert_eq!(fs::read_to_string(&moved_to).unwrap(), "{ not json");
        assert!(moved_to.starts_with(temp.path()));

        // A fresh, valid file replaced the bad one
        let again = gateway.load_tasks().expect("load again");
        assert!(!again.was_recovered());
    }

    #[test]
    fn missing_required_field_is_quarantined() {
        let (gateway, _temp) = create_test_gateway();
        let id = TaskId::new_v4();
        let content = format!(
            r#"{{"tasks": {{"{id}": {{"id": "{id}", "title": "No difficulty"}}}}, "version": "1.0"}}"#
        );
        fs::write(gateway.tasks_path(), content).unwrap();

        let loaded = gateway.load_tasks().expect("recoverable");
        assert!(loaded.was_recovered());
        assert!(loaded.value.is_empty());
    }

    #[test]
    fn mismatched_key_is_quarantined() {
        let (gateway, _temp) = create_test_gateway();
        let task = Task::new("Quest", Difficulty::Easy, Priority::Low, None).unwrap();
        let document = TasksDocument {
            tasks: BTreeMap::from([(TaskId::new_v4().to_string(), &task)]),
            version: Some(SCHEMA_VERSION.to_string()),
            last_modified: None,
        };
        fs::write(gateway.tasks_path(), serde_json::to_string(&document).unwrap()).unwrap();

        let loaded = gateway.load_tasks().expect("recoverable");
        let Some(PersistenceError::Corrupt { reason, .. }) = loaded.recovered else {
            panic!("expected a corruption report");
        };
        assert!(reason.contains("does not match"));
    }

    #[test]
    fn invariant_violation_is_quarantined() {
        let (gateway, _temp) = create_test_gateway();
        let mut task = Task::new("Quest", Difficulty::Easy, Priority::Low, None).unwrap();
        task.status = TaskStatus::Completed;
        let tasks = TaskMap::from([(task.id, task)]);
        gateway.save_tasks(&tasks).expect("save");

        let loaded = gateway.load_tasks().expect("recoverable");
        assert!(loaded.was_recovered());
    }

    #[test]
    fn corrupt_player_file_falls_back_to_default() {
        let (gateway, _temp) = create_test_gateway();
        fs::write(
            gateway.player_path(),
            r#"{"player": {"total_xp": -5}, "version": "1.0"}"#,
        )
        .unwrap();

        let loaded = gateway.load_player_progress().expect("recoverable");
        assert!(loaded.was_recovered());
        assert_eq!(loaded.value, PlayerProgress::default());
    }

    #[test]
    fn older_version_is_accepted_and_rewritten() {
        let (gateway, _temp) = create_test_gateway();
        let tasks = sample_tasks();
        let document = TasksDocument {
            tasks: tasks.iter().map(|(id, t)| (id.to_string(), t)).collect(),
            version: Some("0.9".to_string()),
            last_modified: None,
        };
        fs::write(gateway.tasks_path(), serde_json::to_string(&document).unwrap()).unwrap();

        let loaded = gateway.load_tasks().expect("load");
        assert!(!loaded.was_recovered());
        assert_eq!(loaded.value, tasks);

        gateway.save_tasks(&loaded.value).expect("save");
        let content = fs::read_to_string(gateway.tasks_path()).unwrap();
        assert!(content.contains(r#""version": "1.0""#));
    }

    #[test]
    fn interrupted_write_leaves_previous_content() {
        let (gateway, _temp) = create_test_gateway();
        let tasks = sample_tasks();
        gateway.save_tasks(&tasks).expect("save");

        // A crash mid-write leaves a partial temp file next to the real one
        fs::write(temp_path(&gateway.tasks_path()), r#"{"tasks": {"#).unwrap();

        let loaded = gateway.load_tasks().expect("load");
        assert!(!loaded.was_recovered());
        assert_eq!(loaded.value, tasks);

        // The next save replaces the stale temp file
        gateway.save_tasks(&TaskMap::new()).expect("save over stale temp");
        assert!(!temp_path(&gateway.tasks_path()).exists());
        assert!(gateway.load_tasks().expect("load").value.is_empty());
    }

    #[test]
    fn failed_write_keeps_destination() {
        let (gateway, _temp) = create_test_gateway();
        let tasks = sample_tasks();
        gateway.save_tasks(&tasks).expect("save");

        // A directory squatting on the temp path makes the write fail
        fs::create_dir(temp_path(&gateway.tasks_path())).unwrap();

        let err = gateway.save_tasks(&TaskMap::new()).unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
        assert_eq!(gateway.load_tasks().expect("load").value, tasks);
    }

    #[test]
    fn backup_copies_files() {
        let (gateway, _temp) = create_test_gateway();
        assert!(gateway.create_backup().expect("empty backup").is_none());

        gateway.save_tasks(&sample_tasks()).expect("save tasks");
        gateway
            .save_player_progress(&PlayerProgress::default())
            .expect("save player");

        let target = gateway.backup().expect("backup").expect("backup dir");
        assert!(target.starts_with(gateway.backups_path()));
        assert_eq!(
            fs::read(target.join(TASKS_FILE)).unwrap(),
            fs::read(gateway.tasks_path()).unwrap()
        );
        assert!(target.join(PLAYER_FILE).exists());
    }

    #[test]
    fn backups_are_pruned() {
        let (gateway, _temp) = create_test_gateway();
        let gateway = gateway.with_max_backups(2);
        gateway.save_tasks(&TaskMap::new()).expect("save");

        // Stale backups named like real ones, older than anything made now
        for stamp in ["20000101T000000000Z", "20000102T000000000Z", "20000103T000000000Z"] {
            fs::create_dir_all(gateway.backups_path().join(stamp)).unwrap();
        }

        let newest = gateway.create_backup().expect("backup").expect("dir");

        let mut remaining: Vec<PathBuf> = fs::read_dir(gateway.backups_path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[1], newest);
        assert!(remaining[0].ends_with("20000103T000000000Z"));
    }

    #[test]
    fn temp_path_sits_next_to_destination() {
        let path = Path::new("/data/tasks.json");
        assert_eq!(temp_path(path), PathBuf::from("/data/tasks.json.tmp"));
    }
}
