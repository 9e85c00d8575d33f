//! Configuration types for context-logger.

use crate::locator::{ConstructLocator, ScanOrder, DEFAULT_MAX_PRIOR_LINES};
use crate::rules::{RuleTable, RuleTableBuilder, RuleTableError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default commit message used when publishing.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update index.html with latest logs";

/// Top-level configuration for context-logger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot scheduling and locator settings.
    #[serde(default)]
    pub logger: LoggerConfig,

    /// HTML log and git publishing settings.
    #[serde(default)]
    pub publish: PublishConfig,

    /// Additional or overriding rule sets: language id → kind → pattern.
    #[serde(default)]
    pub languages: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value is out of range.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logger.interval_secs == 0 {
            return Err(ConfigError::Validation {
                message: "logger.interval_secs must be greater than zero".to_string(),
            });
        }
        if self.publish.auto_commit_secs == Some(0) {
            return Err(ConfigError::Validation {
                message: "publish.auto_commit_secs must be greater than zero".to_string(),
            });
        }
        if self.publish.html_file.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "publish.html_file must not be empty".to_string(),
            });
        }
        self.exclude_filter().map(|_| ())
    }

    /// Builds the rule table: built-in languages plus `[languages.*]`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured kind is unknown or a pattern does
    /// not compile.
    pub fn rule_table(&self) -> Result<RuleTable, RuleTableError> {
        let mut builder = RuleTableBuilder::with_builtin();
        for (language, kinds) in &self.languages {
            builder = builder.rules_from_names(
                language.as_str(),
                kinds.iter().map(|(kind, pattern)| (kind.as_str(), pattern.as_str())),
            )?;
        }
        builder.build()
    }

    /// Creates a locator over `table` with the configured window and order.
    #[must_use]
    pub fn locator(&self, table: Arc<RuleTable>) -> ConstructLocator {
        ConstructLocator::new(table)
            .with_max_prior_lines(self.logger.max_prior_lines)
            .with_scan_order(self.logger.scan_order)
    }

    /// Compiles the exclude globs.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid glob.
    pub fn exclude_filter(&self) -> Result<ExcludeFilter, ConfigError> {
        ExcludeFilter::new(&self.logger.exclude)
    }
}

/// Logger-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Seconds between snapshots in `watch` mode.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Lines above the cursor scanned by the fallback phase.
    #[serde(default = "default_max_prior_lines")]
    pub max_prior_lines: usize,

    /// Order of the fallback scan.
    #[serde(default)]
    pub scan_order: ScanOrder,

    /// Overrides the project name reported by the editor.
    #[serde(default)]
    pub project_name: Option<String>,

    /// Glob patterns of documents that are never tracked.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_prior_lines: default_max_prior_lines(),
            scan_order: ScanOrder::default(),
            project_name: None,
            exclude: default_exclude(),
        }
    }
}

/// Publishing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Git work tree holding the HTML log (default: current directory).
    #[serde(default)]
    pub repo: Option<PathBuf>,

    /// HTML log file, relative to the repository.
    #[serde(default = "default_html_file")]
    pub html_file: String,

    /// Commit message for each published row.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Whether to push after committing.
    #[serde(default = "default_true")]
    pub push: bool,

    /// Whether every snapshot tick publishes.
    #[serde(default = "default_true")]
    pub on_tick: bool,

    /// Seconds between auto-commits of the latest snapshot, if enabled.
    #[serde(default)]
    pub auto_commit_secs: Option<u64>,
}

impl PublishConfig {
    /// Returns the repository directory, defaulting to `.`.
    #[must_use]
    pub fn repo_dir(&self) -> PathBuf {
        self.repo.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            repo: None,
            html_file: default_html_file(),
            commit_message: default_commit_message(),
            push: true,
            on_tick: true,
            auto_commit_secs: None,
        }
    }
}

fn default_interval_secs() -> u64 {
    5
}

fn default_max_prior_lines() -> usize {
    DEFAULT_MAX_PRIOR_LINES
}

fn default_exclude() -> Vec<String> {
    vec!["**/target/**".to_string(), "**/node_modules/**".to_string()]
}

fn default_html_file() -> String {
    "index.html".to_string()
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

fn default_true() -> bool {
    true
}

/// Compiled exclude globs.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<glob::Pattern>,
}

impl ExcludeFilter {
    /// Compiles glob patterns.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid glob.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p.as_ref()).map_err(|e| ConfigError::Validation {
                    message: format!("invalid exclude pattern '{}': {e}", p.as_ref()),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if `path` matches any pattern.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.patterns.iter().any(|p| p.matches_path(path))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A setting is out of range.
    #[error("Invalid config: {message}")]
    Validation {
        /// Description of the invalid setting.
        message: String,
    },
}
