//! Subcommand implementations and the setup they share.

pub mod init;
pub mod list_languages;
pub mod locate;
pub mod output;
pub mod replay;
pub mod setup_repo;
pub mod watch;

use anyhow::{bail, Context, Result};
use context_logger_core::{Config, RuleTable, Session, Snapshot};
use context_logger_publish::Publisher;
use std::path::Path;
use std::sync::Arc;

/// Loads the configuration at `path`, or defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Builds the rule table, rendering pattern errors as diagnostics.
pub fn rule_table(config: &Config) -> Result<Arc<RuleTable>> {
    match config.rule_table() {
        Ok(table) => Ok(Arc::new(table)),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            bail!("Invalid [languages] configuration");
        }
    }
}

/// Builds a session from configuration.
pub fn session(config: &Config) -> Result<Session> {
    let table = rule_table(config)?;
    Session::from_config(config, table).context("Failed to create session")
}

/// Opens the configured repository for publishing.
pub fn publisher(config: &Config) -> Result<Publisher> {
    Publisher::from_config(&config.publish).with_context(|| {
        format!(
            "Failed to set up publishing in {}",
            config.publish.repo_dir().display()
        )
    })
}

/// Publishes a snapshot, logging instead of failing.
///
/// Publishing problems never stop logging.
pub fn publish_logged(publisher: &Publisher, snapshot: &Snapshot) {
    match snapshot {
        Snapshot::Context(ctx) => {
            if let Err(e) = publisher.publish(ctx) {
                tracing::warn!("Failed to publish log: {}", e);
            }
        }
        Snapshot::NoActiveEditor => tracing::debug!("No active editor, nothing to publish"),
    }
}
