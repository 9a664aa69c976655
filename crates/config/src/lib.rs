//! Configuration management for the questa application.
//!
//! This crate handles loading and validating configuration
//! from files, environment variables and built-in defaults.
//!
//! # Overview
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`streak`]: Streak policy selection
//! - [`backup`]: Backup retention
//! - [`persistence`]: Config file discovery and reading
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. Environment variables (`QUESTA_DATA_DIR`)
//! 2. Local config (`./questa.json5` or `./questa.json`)
//! 3. User config (`~/.config/questa/config.json5` or `~/.config/questa/config.json`)
//! 4. Built-in defaults
//!
//! # Example File
//!
//! ```json5
//! {
//!   // defaults to the platform data directory
//!   data_dir: "/home/me/quests",
//!   streak: { policy: "calendar_day" },
//!   backups: { max_backups: 5 },
//! }
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod persistence;
pub mod streak;

// Re-export primary types at crate root for convenience
pub use backup::BackupConfig;
pub use config::{Config, DATA_DIR_ENV};
pub use error::{ConfigError, Result};
pub use streak::StreakConfig;
