//! Error types for configuration operations.
//!
//! This module defines the error types that can occur during configuration
//! loading, parsing, and validation.

use std::path::PathBuf;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON5 configuration.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Invalid streak window.
    #[error("invalid streak window: {reason}")]
    InvalidStreakWindow {
        /// The reason the window is invalid.
        reason: String,
    },

    /// Invalid backup retention count.
    #[error("invalid backup retention: {reason}")]
    InvalidBackupRetention {
        /// The reason the count is invalid.
        reason: String,
    },

    /// Failed to determine the platform data directory.
    #[error("could not determine data directory")]
    NoDataDirectory,
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
