//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use questa_protocol::{Difficulty, Priority, TaskStatus};
use questa_store::SortKey;

/// Top-level CLI parser for the `questa` binary.
#[derive(Debug, Parser)]
#[command(name = "questa", version, about = "A quest log for development tasks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data directory (overrides the config file and QUESTA_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file to use instead of the default search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new quest
    Add {
        /// Short summary
        title: String,
        /// easy, medium or hard
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,
        /// low, medium, high or critical
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List quests, newest first
    List {
        /// Only quests with this status
        #[arg(short, long)]
        status: Option<TaskStatus>,
        /// Only quests with this difficulty
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        /// Only quests with this priority
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Sort field
        #[arg(long, value_enum)]
        sort: Option<SortField>,
        /// Reverse the order
        #[arg(short, long)]
        reverse: bool,
    },

    /// Show one quest
    Show {
        /// Quest id or unique id prefix
        id: String,
    },

    /// Edit fields of a quest
    Edit {
        /// Quest id or unique id prefix
        id: String,
        /// Changes as field=value (title, difficulty, priority, status, notes)
        #[arg(required = true, value_parser = parse_assignment)]
        changes: Vec<(String, String)>,
    },

    /// Complete a quest and collect its XP
    Done {
        /// Quest id or unique id prefix
        id: String,
    },

    /// Move a quest to another status
    Status {
        /// Quest id or unique id prefix
        id: String,
        /// pending, active, blocked or completed
        status: TaskStatus,
    },

    /// Delete a quest for good
    Delete {
        /// Quest id or unique id prefix
        id: String,
        /// Back up the data files first
        #[arg(long)]
        backup: bool,
    },

    /// Search titles and notes
    Search {
        /// Text to look for, ignoring case
        text: String,
    },

    /// Show player level, XP and counts
    Stats,

    /// Back up the data files
    Backup,
}

/// Sort fields accepted by `list --sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Created,
    Title,
    Difficulty,
    Priority,
    Status,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Created => Self::CreatedAt,
            SortField::Title => Self::Title,
            SortField::Difficulty => Self::Difficulty,
            SortField::Priority => Self::Priority,
            SortField::Status => Self::Status,
        }
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| format!("expected field=value, got `{raw}`"))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_parses_vocabulary_case_insensitively() {
        let cli = Cli::try_parse_from(["questa", "add", "Fix bug", "-d", "HARD", "-p", "critical"])
            .expect("cli should parse");

        let Command::Add {
            title,
            difficulty,
            priority,
            notes,
        } = cli.command
        else {
            panic!("expected add");
        };
        assert_eq!(title, "Fix bug");
        assert_eq!(difficulty, Difficulty::Hard);
        assert_eq!(priority, Priority::Critical);
        assert!(notes.is_none());
    }

    #[test]
    fn add_defaults_to_medium() {
        let cli = Cli::try_parse_from(["questa", "add", "Quest"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Command::Add {
                difficulty: Difficulty::Medium,
                priority: Priority::Medium,
                ..
            }
        ));
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(Cli::try_parse_from(["questa", "add", "Quest", "-d", "extreme"]).is_err());
    }

    #[test]
    fn edit_parses_assignments() {
        let cli = Cli::try_parse_from(["questa", "edit", "ab12", "title=New = name", "notes="])
            .expect("cli should parse");

        let Command::Edit { id, changes } = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(id, "ab12");
        assert_eq!(
            changes,
            [
                ("title".to_string(), "New = name".to_string()),
                ("notes".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn edit_requires_assignments() {
        assert!(Cli::try_parse_from(["questa", "edit", "ab12"]).is_err());
        assert!(Cli::try_parse_from(["questa", "edit", "ab12", "title"]).is_err());
        assert!(Cli::try_parse_from(["questa", "edit", "ab12", "=x"]).is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["questa", "list", "--status", "active", "--json"])
            .expect("cli should parse");
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::List {
                status: Some(TaskStatus::Active),
                ..
            }
        ));
    }
}
