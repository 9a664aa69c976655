//! Command handlers and text rendering.

use std::fmt::Write as _;

use anyhow::{Context, bail};
use questa_protocol::{PlayerProgress, Task, TaskId, TaskUpdate};
use questa_store::{
    Completion, DeletionSafety, Gateway, SafetyLevel, SortKey, StatusCounts, TaskQuery, TaskStore,
};
use serde::Serialize;

use crate::cli::Command;

/// Shortest id prefix shown in listings.
const SHORT_ID_LEN: usize = 8;

/// Runs one command against `store` and returns what to print.
pub fn dispatch<G: Gateway>(
    command: Command,
    store: &mut TaskStore<G>,
    json: bool,
) -> anyhow::Result<String> {
    match command {
        Command::Add {
            title,
            difficulty,
            priority,
            notes,
        } => {
            let task = store.create(title, difficulty, priority, notes)?;
            output(json, &task, || format!("Added {}\n", task_line(&task)))
        }

        Command::List {
            status,
            difficulty,
            priority,
            sort,
            reverse,
        } => {
            let mut query = match sort {
                Some(field) => TaskQuery::default().sorted_by(field.into(), reverse),
                None => TaskQuery::default().sorted_by(SortKey::CreatedAt, !reverse),
            };
            query.status = status;
            query.difficulty = difficulty;
            query.priority = priority;

            let tasks = store.query(&query);
            output(json, &tasks, || render_list(&tasks))
        }

        Command::Show { id } => {
            let id = resolve_id(store, &id)?;
            let task = store.get_task(id)?;
            output(json, task, || render_task(task))
        }

        Command::Edit { id, changes } => {
            let id = resolve_id(store, &id)?;
            let update =
                TaskUpdate::from_fields(changes.iter().map(|(f, v)| (f.as_str(), v.as_str())))
                    .with_context(|| format!("update rejected for task {id}"))?;
            let task = store.update(id, &update)?;
            output(json, &task, || format!("Updated {}\n", task_line(&task)))
        }

        Command::Done { id } => {
            let id = resolve_id(store, &id)?;
            let completion = store.complete(id)?;
            output(json, &CompletionView::from(&completion), || {
                render_completion(&completion, store.player())
            })
        }

        Command::Status { id, status } => {
            let id = resolve_id(store, &id)?;
            let xp_before = store.player().total_xp();
            let task = store.set_status(id, status)?;
            output(json, &task, || {
                let mut out = format!("Moved {}\n", task_line(&task));
                let earned = store.player().total_xp().saturating_sub(xp_before);
                if earned > 0 {
                    let _ = writeln!(out, "+{earned} XP");
                }
                out
            })
        }

        Command::Delete { id, backup } => {
            let id = resolve_id(store, &id)?;
            let safety = store.deletion_safety(id)?;
            let mut out = String::new();
            if backup {
                if let Some(path) = store.backup()? {
                    let _ = writeln!(out, "Backed up to {}", path.display());
                }
            }
            out.push_str(&render_safety(&safety));
            store.delete(id)?;
            if json {
                return json_string(&serde_json::json!({ "deleted": id }));
            }
            let _ = writeln!(out, "Deleted task {id}");
            Ok(out)
        }

        Command::Search { text } => {
            let tasks = store.search(&text);
            output(json, &tasks, || render_list(&tasks))
        }

        Command::Stats => {
            let stats = store.player().statistics();
            let counts = store.counts();
            output(
                json,
                &serde_json::json!({ "player": stats, "tasks": counts }),
                || render_stats(store.player(), &counts),
            )
        }

        Command::Backup => match store.backup()? {
            Some(path) => Ok(format!("Backed up to {}\n", path.display())),
            None => Ok("Nothing to back up yet\n".to_string()),
        },
    }
}

/// Finds the task whose id equals or starts with `text`.
///
/// # Errors
///
/// Returns an error when no task or more than one task matches.
pub fn resolve_id<G: Gateway>(store: &TaskStore<G>, text: &str) -> anyhow::Result<TaskId> {
    let text = text.trim().to_ascii_lowercase();
    if let Ok(id) = text.parse::<TaskId>() {
        return Ok(id);
    }
    if text.is_empty() {
        bail!("task id cannot be empty");
    }

    let mut matches = store
        .get(None)
        .into_iter()
        .map(|task| task.id)
        .filter(|id| id.to_string().starts_with(&text));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => bail!("no task id starts with `{text}`"),
        (Some(_), Some(_)) => bail!("task id prefix `{text}` is ambiguous"),
    }
}

#[derive(Serialize)]
struct CompletionView<'a> {
    task: &'a Task,
    xp_awarded: u64,
    level_before: u32,
    level_after: u32,
}

impl<'a> From<&'a Completion> for CompletionView<'a> {
    fn from(completion: &'a Completion) -> Self {
        Self {
            task: &completion.task,
            xp_awarded: completion.xp_awarded,
            level_before: completion.level.from,
            level_after: completion.level.to,
        }
    }
}

fn output<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<String> {
    if json {
        json_string(value)
    } else {
        Ok(text())
    }
}

fn json_string<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("failed to encode output")?;
    out.push('\n');
    Ok(out)
}

fn short_id(id: TaskId) -> String {
    id.to_string()[..SHORT_ID_LEN].to_string()
}

/// One-line summary of a task.
pub fn task_line(task: &Task) -> String {
    format!(
        "{}  [{}] {} ({}, {}, {} XP)",
        short_id(task.id),
        task.status,
        task.title,
        task.difficulty,
        task.priority,
        task.xp_reward
    )
}

pub fn render_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No quests\n".to_string();
    }
    tasks.iter().fold(String::new(), |mut out, task| {
        let _ = writeln!(out, "{}", task_line(task));
        out
    })
}

pub fn render_task(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", task.title);
    let _ = writeln!(out, "  id:         {}", task.id);
    let _ = writeln!(out, "  status:     {}", task.status);
    let _ = writeln!(out, "  difficulty: {}", task.difficulty);
    let _ = writeln!(out, "  priority:   {}", task.priority);
    let _ = writeln!(out, "  reward:     {} XP", task.xp_reward);
    let _ = writeln!(out, "  created:    {}", task.created_at.to_rfc3339());
    if let Some(at) = task.completed_at {
        let _ = writeln!(out, "  completed:  {}", at.to_rfc3339());
    }
    if let Some(notes) = &task.notes {
        let _ = writeln!(out, "  notes:      {notes}");
    }
    out
}

pub fn render_completion(completion: &Completion, player: &PlayerProgress) -> String {
    let mut out = format!(
        "Completed {}\n+{} XP (total {})\n",
        completion.task.title,
        completion.xp_awarded,
        player.total_xp()
    );
    if completion.level.is_level_up() {
        let _ = writeln!(out, "Level up! {} -> {}", completion.level.from, completion.level.to);
    }
    out
}

pub fn render_safety(safety: &DeletionSafety) -> String {
    if safety.level == SafetyLevel::Safe {
        return String::new();
    }
    let mut out = String::new();
    for warning in &safety.warnings {
        let _ = writeln!(out, "{}: {warning}", safety.level);
    }
    out
}

pub fn render_stats(player: &PlayerProgress, counts: &StatusCounts) -> String {
    let stats = player.statistics();
    let mut out = String::new();
    let _ = writeln!(out, "Level {}", stats.level);
    match stats.xp_to_next_level {
        Some(missing) => {
            let _ = writeln!(
                out,
                "XP: {} ({missing} to next level, {:.0}% through)",
                stats.total_xp,
                stats.level_progress * 100.0
            );
        }
        None => {
            let _ = writeln!(out, "XP: {} (max level)", stats.total_xp);
        }
    }
    let _ = writeln!(
        out,
        "Completed: {} (easy {}, medium {}, hard {})",
        stats.tasks_completed, stats.completions.easy, stats.completions.medium, stats.completions.hard
    );
    let _ = writeln!(out, "Streak: {}", stats.current_streak);
    let _ = writeln!(
        out,
        "Quests: {} pending, {} active, {} blocked, {} completed",
        counts.pending, counts.active, counts.blocked, counts.completed
    );
    out
}
