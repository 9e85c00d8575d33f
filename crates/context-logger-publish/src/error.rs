//! Publishing errors.

use std::path::PathBuf;

/// Errors raised while writing the HTML log or talking to git.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Reading or writing a file failed.
    #[error("Failed to access {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The directory is not a git work tree.
    #[error("{path} is not a git repository: {stderr}")]
    NotARepository {
        /// Directory that was checked.
        path: PathBuf,
        /// Output of `git status`.
        stderr: String,
    },

    /// The HTML log has no log table to insert into.
    #[error("Table with id \"{table_id}\" not found in {path}")]
    TableNotFound {
        /// HTML file that was searched.
        path: PathBuf,
        /// Id of the missing `<tbody>`.
        table_id: &'static str,
    },

    /// A git command exited unsuccessfully or could not be started.
    #[error("git {command} failed: {stderr}")]
    Git {
        /// Subcommand that failed (e.g. `commit`).
        command: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A legacy log line did not have the expected fields.
    #[error("Malformed log line: {reason}")]
    MalformedLogLine {
        /// What was wrong with the line.
        reason: String,
    },
}
