//! Locating `context-logger.toml` for a run.
//!
//! Editors start the logger from whatever directory a file lives in, so the
//! search walks from the working directory up to the enclosing git work tree
//! (the directory holding `.git`), trying `context-logger.toml` then
//! `.context-logger.toml` at each level. The global directory comes last.

use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "context-logger.toml";
const HIDDEN_CONFIG_FILE: &str = ".context-logger.toml";
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Candidate configuration files, in priority order.
#[derive(Debug, Default)]
pub struct ConfigSearch {
    candidates: Vec<PathBuf>,
}

impl ConfigSearch {
    /// Candidates from `dir` up to its git work tree root.
    ///
    /// Outside a work tree every ancestor is searched.
    #[must_use]
    pub fn project(dir: &Path) -> Self {
        let mut candidates = Vec::new();
        for level in dir.ancestors() {
            candidates.push(level.join(CONFIG_FILE));
            candidates.push(level.join(HIDDEN_CONFIG_FILE));
            if level.join(".git").exists() {
                break;
            }
        }
        Self { candidates }
    }

    /// Appends `config.toml` in the global directory, when there is one.
    #[must_use]
    pub fn with_global_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.candidates.push(dir.join(GLOBAL_CONFIG_FILE));
        }
        self
    }

    /// Paths that will be tried, first to last.
    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// The first candidate that exists.
    #[must_use]
    pub fn find(&self) -> Option<PathBuf> {
        let found = self.candidates().iter().find(|p| p.is_file()).cloned();
        match &found {
            Some(path) => tracing::debug!("Using config: {}", path.display()),
            None => tracing::debug!(
                "No config among {} candidate(s), using defaults",
                self.candidates().len()
            ),
        }
        found
    }
}

/// `$CONTEXT_LOGGER_CONFIG_DIR`, else `~/.context-logger`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("CONTEXT_LOGGER_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".context-logger")))
}
