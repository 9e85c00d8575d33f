//! Thin wrapper over the `git` command line.

use crate::error::PublishError;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, info};

/// A git work tree the log is committed to.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Opens a work tree, verifying it with `git status`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::NotARepository`] if `git status` fails there,
    /// or [`PublishError::Git`] if git cannot be started.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PublishError> {
        let root = root.into();
        let repo = Self { root };
        let output = repo.spawn("status", &["status", "--porcelain"])?;
        if !output.status.success() {
            return Err(PublishError::NotARepository {
                path: repo.root,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!("Opened git repository at {}", repo.root.display());
        Ok(repo)
    }

    /// Returns the work tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stages a file.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Git`] if `git add` fails.
    pub fn add(&self, path: &Path) -> Result<(), PublishError> {
        let path = path.to_string_lossy();
        self.run("add", &["add", "--", &path])
    }

    /// Commits staged changes.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Git`] if `git commit` fails, including when
    /// nothing is staged.
    pub fn commit(&self, message: &str) -> Result<(), PublishError> {
        self.run("commit", &["commit", "-m", message])
    }

    /// Pushes the current branch to its upstream.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Git`] if `git push` fails.
    pub fn push(&self) -> Result<(), PublishError> {
        self.run("push", &["push"])?;
        info!("Pushed {}", self.root.display());
        Ok(())
    }

    fn run(&self, command: &str, args: &[&str]) -> Result<(), PublishError> {
        let output = self.spawn(command, args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // `git commit` reports "nothing to commit" on stdout.
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(PublishError::Git {
                command: command.to_string(),
                stderr: detail.trim().to_string(),
            });
        }
        debug!("git {} succeeded in {}", command, self.root.display());
        Ok(())
    }

    fn spawn(&self, command: &str, args: &[&str]) -> Result<Output, PublishError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| PublishError::Git {
                command: command.to_string(),
                stderr: format!("failed to execute git: {e}"),
            })
    }
}
