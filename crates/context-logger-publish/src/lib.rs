//! # context-logger-publish
//!
//! Persists context snapshots as rows of a searchable HTML page committed
//! to a git repository.
//!
//! - [`HtmlLog`] creates the page and inserts rows, newest first
//! - [`GitRepo`] stages, commits and pushes through the `git` binary
//! - [`Publisher`] runs the whole sequence for one snapshot
//!
//! ## Example
//!
//! ```ignore
//! use context_logger_publish::Publisher;
//!
//! let publisher = Publisher::setup(Path::new("../my-logs"), "index.html")?
//!     .with_push(false);
//! publisher.publish(&snapshot)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod git;
mod html;
mod publisher;

pub use error::PublishError;
pub use git::GitRepo;
pub use html::{insert_row, HtmlLog, LogRow, HEADERS, TABLE_ID};
pub use publisher::Publisher;
