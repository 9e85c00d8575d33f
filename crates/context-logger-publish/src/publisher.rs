//! Append, stage, commit and push: one snapshot per call.

use crate::error::PublishError;
use crate::git::GitRepo;
use crate::html::{HtmlLog, LogRow};
use context_logger_core::{ContextSnapshot, PublishConfig, DEFAULT_COMMIT_MESSAGE};
use std::path::{Path, PathBuf};
use tracing::info;

/// Publishes snapshots into an HTML log tracked by git.
#[derive(Debug, Clone)]
pub struct Publisher {
    repo: GitRepo,
    html_file: PathBuf,
    log: HtmlLog,
    commit_message: String,
    push: bool,
}

impl Publisher {
    /// Opens the repository and creates the HTML log if it is absent.
    ///
    /// `html_file` is relative to the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if `repo_dir` is not a git work tree or the log
    /// cannot be created.
    pub fn setup(repo_dir: &Path, html_file: impl Into<PathBuf>) -> Result<Self, PublishError> {
        let repo = GitRepo::open(repo_dir)?;
        let html_file = html_file.into();
        let log = HtmlLog::new(repo.root().join(&html_file));
        log.create()?;
        info!("Publishing to {}", log.path().display());

        Ok(Self {
            repo,
            html_file,
            log,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            push: true,
        })
    }

    /// Sets up a publisher from the `[publish]` configuration.
    ///
    /// # Errors
    ///
    /// See [`Publisher::setup`].
    pub fn from_config(config: &PublishConfig) -> Result<Self, PublishError> {
        Ok(Self::setup(&config.repo_dir(), &config.html_file)?
            .with_commit_message(config.commit_message.clone())
            .with_push(config.push))
    }

    /// Sets the commit message.
    #[must_use]
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Enables or disables pushing after each commit.
    #[must_use]
    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    /// Returns the HTML log.
    #[must_use]
    pub fn log(&self) -> &HtmlLog {
        &self.log
    }

    /// Publishes one snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first failing step. A missing log table stops before
    /// anything is staged.
    pub fn publish(&self, snapshot: &ContextSnapshot) -> Result<(), PublishError> {
        self.publish_row(&LogRow::from_snapshot(snapshot))
    }

    /// Publishes an already built row.
    ///
    /// # Errors
    ///
    /// See [`Publisher::publish`].
    pub fn publish_row(&self, row: &LogRow) -> Result<(), PublishError> {
        self.log.prepend_row(row)?;
        self.repo.add(&self.html_file)?;
        self.repo.commit(&self.commit_message)?;
        if self.push {
            self.repo.push()?;
        }
        info!("Published log row for {}", row.cells()[1]);
        Ok(())
    }
}
