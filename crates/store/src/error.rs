//! Error types for the store.
//!
//! [`StoreError`] is what callers of the task store see. Its four variants
//! are the whole taxonomy: bad input, unknown id, forbidden state change, and
//! storage trouble. Each carries the [`Operation`] that failed so that a
//! single line is enough to tell the user what went wrong.

use std::fmt;
use std::path::PathBuf;

use questa_protocol::{ProtocolError, TaskId};

/// The store operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Loading data when the store opens.
    Open,
    /// Creating a task.
    Create,
    /// Looking a task up.
    Get,
    /// Editing a task.
    Update,
    /// Completing a task.
    Complete,
    /// Changing a task's status.
    SetStatus,
    /// Deleting a task.
    Delete,
    /// Writing pending changes again.
    Flush,
    /// Backing up the data files.
    Backup,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Create => "create",
            Self::Get => "get",
            Self::Update => "update",
            Self::Complete => "complete",
            Self::SetStatus => "set status",
            Self::Delete => "delete",
            Self::Flush => "flush",
            Self::Backup => "backup",
        })
    }
}

/// Errors raised by the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A data file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A data file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        /// What was being serialized.
        what: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A data file failed validation and was moved aside.
    ///
    /// This is reported, not returned: loading carries on with empty data.
    #[error("{path} is corrupt ({reason}); moved to {moved_to}")]
    Corrupt {
        /// The file that failed validation.
        path: PathBuf,
        /// Where the bad file now lives.
        moved_to: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A backup could not be made.
    #[error("failed to back up {path}: {source}")]
    Backup {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by [`TaskStore`](crate::TaskStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The input was malformed or named a field that cannot be edited.
    #[error("{operation} rejected{}: {source}", for_task(.id))]
    Validation {
        /// The failed operation.
        operation: Operation,
        /// The task involved, if there was one.
        id: Option<TaskId>,
        /// What was wrong.
        #[source]
        source: ProtocolError,
    },

    /// No task has the given id.
    #[error("{operation} failed: task {id} not found")]
    NotFound {
        /// The failed operation.
        operation: Operation,
        /// The unknown id.
        id: TaskId,
    },

    /// The task's status forbids the change.
    #[error("{operation} rejected for task {id}: {source}")]
    State {
        /// The failed operation.
        operation: Operation,
        /// The task involved.
        id: TaskId,
        /// What was forbidden.
        #[source]
        source: ProtocolError,
    },

    /// The change is in memory but could not be made durable.
    #[error("{operation} failed: {source}")]
    Persistence {
        /// The failed operation.
        operation: Operation,
        /// The storage failure.
        #[source]
        source: PersistenceError,
    },
}

impl StoreError {
    /// Wraps an entity error, routing it to `Validation` or `State`.
    pub(crate) fn rejected(operation: Operation, id: Option<TaskId>, source: ProtocolError) -> Self {
        match id {
            Some(id) if source.is_state_error() => Self::State {
                operation,
                id,
                source,
            },
            _ => Self::Validation {
                operation,
                id,
                source,
            },
        }
    }

    /// Returns the operation that failed.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Validation { operation, .. }
            | Self::NotFound { operation, .. }
            | Self::State { operation, .. }
            | Self::Persistence { operation, .. } => *operation,
        }
    }

    /// Returns the task the error is about, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::Validation { id, .. } => *id,
            Self::NotFound { id, .. } | Self::State { id, .. } => Some(*id),
            Self::Persistence { .. } => None,
        }
    }
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

fn for_task(id: &Option<TaskId>) -> String {
    id.map(|id| format!(" for task {id}")).unwrap_or_default()
}
