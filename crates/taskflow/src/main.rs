//! CLI entry point for taskflow.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use taskflow_app::{AppConfig, TaskService};
use taskflow_core::{SortOrder, TaskFilter};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Local task list with filters, sorting and progress.
#[derive(Parser, Debug)]
#[command(
    name = "taskflow",
    version,
    about = "taskflow: a local task list with filters, sorting and progress"
)]
struct Cli {
    /// Directory holding the task file and config.toml (defaults to the platform data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task. Words are joined with single spaces.
    Add {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Remove a task by id or unique id prefix.
    Rm { id: String },

    /// Flip a task between active and done.
    Toggle { id: String },

    /// Remove every completed task.
    Clear,

    /// List tasks.
    Ls {
        /// all, active or completed (defaults to config).
        #[arg(long)]
        filter: Option<TaskFilter>,
        /// newest, oldest, alphabetical or completed-last (defaults to config).
        #[arg(long)]
        sort: Option<SortOrder>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Show task counts and progress.
    Stats,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { data_dir, cmd } = Cli::parse();
    install_tracing();

    let data_dir = resolve_data_dir(data_dir)?;
    let config = AppConfig::load(&data_dir)?;
    let mut service = TaskService::open_dir(&data_dir, &config)?;
    debug!(tasks = service.tasks().len(), key = %config.storage.key, "Opened task list");
    commands::run(cmd, &mut service, &mut io::stdout().lock())
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir,
        None => dirs::data_dir()
            .map(|base| base.join("taskflow"))
            .context("could not determine a data directory; pass --data-dir")?,
    };
    debug!(dir = %dir.display(), "Using data directory");
    Ok(dir)
}

fn install_tracing() {
    // RUST_LOG overrides the default; logs go to stderr so stdout stays parseable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
