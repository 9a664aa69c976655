//! questa - a quest log for development tasks.
//!
//! This is the command-line front end: it loads the configuration, opens the
//! task store on the configured data directory and runs one command.

use anyhow::Context;
use clap::Parser;
use questa_config::Config;
use questa_store::{JsonFileGateway, TaskStore, streak};

mod cli;
mod commands;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "QUESTA_LOG";

fn main() {
    if let Err(error) = run() {
        eprintln!("questa: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let data_dir = config.resolve_data_dir()?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let gateway = JsonFileGateway::new(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?
        .with_max_backups(config.backups.max_backups);
    let mut store = TaskStore::open(gateway)?.with_streak_policy(streak::policy_for(&config.streak));

    for report in store.recovered() {
        eprintln!("questa: warning: {report}");
    }

    let output = commands::dispatch(cli.command, &mut store, cli.json)?;
    print!("{output}");
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
