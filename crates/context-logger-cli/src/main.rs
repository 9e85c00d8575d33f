//! context-logger CLI tool.
//!
//! Usage:
//! ```bash
//! context-logger locate src/app.py --line 42
//! context-logger replay session.jsonl [--publish]
//! editor-bridge | context-logger watch --interval 5
//! context-logger setup-repo ../my-logs
//! context-logger init
//! context-logger list-languages
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_search;

/// Logs what you are editing: file, enclosing function/class and typing activity
#[derive(Parser)]
#[command(name = "context-logger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the construct enclosing a line of a file
    Locate {
        /// Source file to inspect
        file: PathBuf,

        /// Line number (1-indexed)
        #[arg(short, long)]
        line: usize,

        /// Language id (inferred from the extension if omitted)
        #[arg(long)]
        language: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Replay a JSON-lines editor event file, printing a snapshot per tick
    Replay {
        /// Event file (one JSON event per line)
        events: PathBuf,

        /// Publish each snapshot to the configured repository
        #[arg(long)]
        publish: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Read editor events from stdin and log a snapshot every interval
    Watch {
        /// Seconds between snapshots (overrides `logger.interval_secs`)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Publish snapshots to the configured repository
        #[arg(long)]
        publish: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Verify a git repository and create the HTML log in it
    SetupRepo {
        /// Repository directory (default: `publish.repo` or current directory)
        dir: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// List languages and the construct kinds recognised for each
    ListLanguages,
}

/// Output format for snapshots and constructs.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text, one line per snapshot.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries snapshots only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = match cli.config {
        Some(path) => Some(path),
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            config_search::ConfigSearch::project(&cwd)
                .with_global_dir(config_search::global_config_dir())
                .find()
        }
    };
    let config = config_path.as_deref();

    match cli.command {
        Commands::Locate {
            file,
            line,
            language,
            format,
        } => commands::locate::run(&file, line, language, format, config),
        Commands::Replay {
            events,
            publish,
            format,
        } => commands::replay::run(&events, publish, format, config),
        Commands::Watch {
            interval,
            publish,
            format,
        } => commands::watch::run(interval, publish, format, config),
        Commands::SetupRepo { dir } => commands::setup_repo::run(dir, config),
        Commands::Init { force } => commands::init::run(force),
        Commands::ListLanguages => commands::list_languages::run(config),
    }
}
