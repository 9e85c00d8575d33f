//! # context-logger-core
//!
//! Heuristic engine that answers "what is the developer editing right now".
//!
//! This crate provides:
//!
//! - [`RuleTable`]: per-language single-line patterns plus a generic fallback
//! - [`ConstructLocator`]: finds the function/class/... around a cursor line
//! - [`Accumulator`]: per-document typing counters fed by edit batches
//! - [`SnapshotBuilder`]: composes the above into a [`ContextSnapshot`]
//! - [`Session`]: drives all of it from a stream of [`EditorEvent`]s
//!
//! ## Example
//!
//! ```
//! use context_logger_core::{ConstructLocator, LanguageId, RuleTable};
//! use std::sync::Arc;
//!
//! let table = Arc::new(RuleTable::builtin()?);
//! let locator = ConstructLocator::new(table);
//! let found = locator.locate(&LanguageId::new("python"), "def foo(x):", None, None, []);
//! assert_eq!(found.to_string(), "function: foo");
//! # Ok::<(), context_logger_core::RuleTableError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod accumulator;
mod config;
mod editor;
mod language;
mod locator;
mod rules;
mod session;
mod snapshot;

pub use accumulator::{Accumulator, ActivityCounters, TypingTotals};
pub use config::{
    Config, ConfigError, ExcludeFilter, LoggerConfig, PublishConfig, DEFAULT_COMMIT_MESSAGE,
};
pub use editor::{BufferDocument, Buffers, EditorEvent, EditorSession, TextDocument, TextEdit};
pub use language::LanguageId;
pub use locator::{
    Construct, ConstructLocator, ScanOrder, DEFAULT_MAX_PRIOR_LINES, UNKNOWN_CONSTRUCT,
};
pub use rules::{
    ConstructKind, MatchResult, Rule, RuleSet, RuleTable, RuleTableBuilder, RuleTableError,
};
pub use session::Session;
pub use snapshot::{
    ContextSnapshot, Snapshot, SnapshotBuilder, NO_ACTIVE_EDITOR, TIMESTAMP_FORMAT,
    UNTITLED_FILE, UNTITLED_PROJECT,
};
