//! A logging session: editor state, typing counters and the snapshot
//! builder driven by one event stream.

use crate::accumulator::Accumulator;
use crate::config::{Config, ConfigError, ExcludeFilter};
use crate::editor::{Buffers, EditorEvent};
use crate::rules::RuleTable;
use crate::snapshot::{Snapshot, SnapshotBuilder};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::debug;

/// Owns everything a snapshot needs and routes editor events to it.
#[derive(Debug, Clone)]
pub struct Session {
    buffers: Buffers,
    accumulator: Accumulator,
    builder: SnapshotBuilder,
    exclude: ExcludeFilter,
}

impl Session {
    /// Creates a session with no open documents.
    #[must_use]
    pub fn new(builder: SnapshotBuilder) -> Self {
        Self {
            buffers: Buffers::new(),
            accumulator: Accumulator::new(),
            builder,
            exclude: ExcludeFilter::default(),
        }
    }

    /// Creates a session from configuration and a built rule table.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude glob is invalid.
    pub fn from_config(config: &Config, table: Arc<RuleTable>) -> Result<Self, ConfigError> {
        let mut builder = SnapshotBuilder::new(config.locator(table));
        if let Some(name) = &config.logger.project_name {
            builder = builder.with_project_name(name.clone());
        }
        Ok(Self::new(builder).with_exclude(config.exclude_filter()?))
    }

    /// Sets the documents that are never tracked.
    #[must_use]
    pub fn with_exclude(mut self, exclude: ExcludeFilter) -> Self {
        self.exclude = exclude;
        self
    }

    /// Sets the project name the editor reports.
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.buffers = self.buffers.with_project_name(name);
        self
    }

    /// Applies an event; returns a snapshot for `tick`.
    pub fn handle(&mut self, event: &EditorEvent) -> Option<Snapshot> {
        if let Some(path) = event.path() {
            if self.exclude.is_excluded(path) {
                debug!("Skipping excluded document {}", path.display());
                return None;
            }
        }

        self.buffers.apply(event);
        self.accumulator.apply(event);

        matches!(event, EditorEvent::Tick).then(|| self.snapshot())
    }

    /// Builds a snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.builder.build(&self.buffers, &self.accumulator)
    }

    /// Builds a snapshot with an explicit timestamp.
    #[must_use]
    pub fn snapshot_at(&self, timestamp: DateTime<Local>) -> Snapshot {
        self.builder
            .build_at(&self.buffers, &self.accumulator, timestamp)
    }

    /// Returns the editor state.
    #[must_use]
    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    /// Returns the typing counters.
    #[must_use]
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextEdit;
    use std::path::Path;

    fn session() -> Session {
        let table = Arc::new(RuleTable::builtin().expect("built-in rules"));
        Session::from_config(&Config::default(), table).expect("session")
    }

    #[test]
    fn tick_returns_snapshot() {
        let mut session = session();
        assert!(session
            .handle(&EditorEvent::Open {
                path: "main.go".into(),
                language: None,
                text: "func main() {\n}\n".into(),
            })
            .is_none());

        let snapshot = session.handle(&EditorEvent::Tick).expect("snapshot on tick");
        let ctx = snapshot.context().expect("active document");
        assert_eq!(ctx.file_name, "main.go");
        assert_eq!(ctx.construct.to_string(), "function: main");
    }

    #[test]
    fn tick_without_document_reports_no_editor() {
        let mut session = session();
        assert_eq!(session.handle(&EditorEvent::Tick), Some(Snapshot::NoActiveEditor));
    }

    #[test]
    fn excluded_documents_are_not_tracked() {
        let mut session = session();
        let path = "app/target/debug/gen.rs";
        session.handle(&EditorEvent::Open {
            path: path.into(),
            language: None,
            text: String::new(),
        });
        session.handle(&EditorEvent::Change {
            path: path.into(),
            text: "x".into(),
            edits: vec![TextEdit::insert(0, "x")],
        });

        assert!(session.buffers().is_empty());
        assert!(!session.accumulator().is_tracking(Path::new(path)));
    }

    #[test]
    fn configured_project_name_is_used() {
        let mut config = Config::default();
        config.logger.project_name = Some("override".into());
        let table = Arc::new(RuleTable::builtin().expect("built-in rules"));
        let mut session = Session::from_config(&config, table)
            .expect("session")
            .with_project_name("editor");
        session.handle(&EditorEvent::Open {
            path: "a.rb".into(),
            language: None,
            text: "def run".into(),
        });

        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.context().map(|c| c.project_name.as_str()),
            Some("override")
        );
    }
}
