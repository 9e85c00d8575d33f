//! Context snapshots: what the developer is working on, right now.

use crate::accumulator::{Accumulator, TypingTotals};
use crate::editor::EditorSession;
use crate::locator::{Construct, ConstructLocator};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Project name used when the editor reports none.
pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// File name used when the active document has no file name.
pub const UNTITLED_FILE: &str = "Untitled File";

/// Text of a snapshot taken without a focused document.
pub const NO_ACTIVE_EDITOR: &str = "No active editor found.";

/// Wall-clock format of the `Date` field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Immutable record of the editing context at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSnapshot {
    /// Project (workspace) name.
    pub project_name: String,
    /// Final path component of the active document.
    pub file_name: String,
    /// Construct enclosing the cursor.
    pub construct: Construct,
    /// Typing counters of the active document.
    pub totals: TypingTotals,
    /// Local time the snapshot was taken.
    pub timestamp: DateTime<Local>,
}

impl ContextSnapshot {
    /// Returns the timestamp rendered with [`TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for ContextSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Project: {}, File: {}, Function: {}, Chars Typed: {}, Chars Deleted: {}, \
             Words Added: {}, Words Deleted: {}, Date: {}",
            self.project_name,
            self.file_name,
            self.construct,
            self.totals.chars_typed,
            self.totals.chars_deleted,
            self.totals.words_added,
            self.totals.words_deleted,
            self.formatted_timestamp(),
        )
    }
}

/// Result of a snapshot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Snapshot {
    /// A document was focused.
    Context(ContextSnapshot),
    /// No document was focused.
    NoActiveEditor,
}

impl Snapshot {
    /// Returns the context, if a document was focused.
    #[must_use]
    pub fn context(&self) -> Option<&ContextSnapshot> {
        match self {
            Self::Context(ctx) => Some(ctx),
            Self::NoActiveEditor => None,
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(ctx) => fmt::Display::fmt(ctx, f),
            Self::NoActiveEditor => f.write_str(NO_ACTIVE_EDITOR),
        }
    }
}

/// Composes locator output, typing counters and editor metadata.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    locator: ConstructLocator,
    project_name: Option<String>,
}

impl SnapshotBuilder {
    /// Creates a builder around a locator.
    #[must_use]
    pub fn new(locator: ConstructLocator) -> Self {
        Self {
            locator,
            project_name: None,
        }
    }

    /// Overrides the project name the editor reports.
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Returns the locator.
    #[must_use]
    pub fn locator(&self) -> &ConstructLocator {
        &self.locator
    }

    /// Builds a snapshot stamped with the current local time.
    pub fn build(&self, session: &dyn EditorSession, accumulator: &Accumulator) -> Snapshot {
        self.build_at(session, accumulator, Local::now())
    }

    /// Builds a snapshot with an explicit timestamp.
    pub fn build_at(
        &self,
        session: &dyn EditorSession,
        accumulator: &Accumulator,
        timestamp: DateTime<Local>,
    ) -> Snapshot {
        let Some(doc) = session.active_document() else {
            return Snapshot::NoActiveEditor;
        };

        let project_name = self
            .project_name
            .as_deref()
            .or_else(|| session.project_name())
            .unwrap_or(UNTITLED_PROJECT)
            .to_string();

        Snapshot::Context(ContextSnapshot {
            project_name,
            file_name: short_name(doc.path()),
            construct: self.locator.locate_in(doc),
            totals: accumulator.read(doc.path()).totals(),
            timestamp,
        })
    }
}

fn short_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNTITLED_FILE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Buffers, EditorEvent, TextEdit};
    use crate::rules::RuleTable;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn builder() -> SnapshotBuilder {
        let table = Arc::new(RuleTable::builtin().expect("built-in rules"));
        SnapshotBuilder::new(ConstructLocator::new(table))
    }

    fn at() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn open(buffers: &mut Buffers, acc: &mut Accumulator, path: &str, text: &str) {
        let event = EditorEvent::Open {
            path: path.into(),
            language: None,
            text: text.into(),
        };
        buffers.apply(&event);
        acc.apply(&event);
    }

    #[test]
    fn no_active_document() {
        let snapshot = builder().build_at(&Buffers::new(), &Accumulator::new(), at());
        assert_eq!(snapshot, Snapshot::NoActiveEditor);
        assert_eq!(snapshot.to_string(), "No active editor found.");
    }

    #[test]
    fn renders_eight_fields() {
        let mut buffers = Buffers::new().with_project_name("webapp");
        let mut acc = Accumulator::new();
        open(&mut buffers, &mut acc, "src/views.py", "def index(request):\n    pass\n");

        let change = EditorEvent::Change {
            path: "src/views.py".into(),
            text: "def index(request):\n    return ok\n".into(),
            edits: vec![TextEdit::new(24, 4, "return ok")],
        };
        buffers.apply(&change);
        acc.apply(&change);

        let snapshot = builder().build_at(&buffers, &acc, at());
        insta::assert_snapshot!(
            snapshot.to_string(),
            @"Project: webapp, File: views.py, Function: function: index, Chars Typed: 5, Chars Deleted: 0, Words Added: 1, Words Deleted: 0, Date: 2024-03-01 09:30:00"
        );
    }

    #[test]
    fn defaults_and_unknown_construct() {
        let mut buffers = Buffers::new();
        let mut acc = Accumulator::new();
        open(&mut buffers, &mut acc, "notes/todo.txt", "buy milk");

        let snapshot = builder().build_at(&buffers, &acc, at());
        insta::assert_snapshot!(
            snapshot.to_string(),
            @"Project: Untitled Project, File: todo.txt, Function: Unknown Function/Class, Chars Typed: 0, Chars Deleted: 0, Words Added: 0, Words Deleted: 0, Date: 2024-03-01 09:30:00"
        );
    }

    #[test]
    fn configured_project_name_wins() {
        let mut buffers = Buffers::new().with_project_name("from-editor");
        let mut acc = Accumulator::new();
        open(&mut buffers, &mut acc, "main.go", "func main() {");

        let snapshot = builder()
            .with_project_name("from-config")
            .build_at(&buffers, &acc, at());
        let ctx = snapshot.context().expect("context snapshot");
        assert_eq!(ctx.project_name, "from-config");
        assert_eq!(ctx.construct.to_string(), "function: main");
    }

    #[test]
    fn short_name_falls_back() {
        assert_eq!(short_name(Path::new("a/b/c.rs")), "c.rs");
        assert_eq!(short_name(Path::new("/")), UNTITLED_FILE);
    }

    #[test]
    fn serializes_structured_fields() {
        let mut buffers = Buffers::new();
        let mut acc = Accumulator::new();
        open(&mut buffers, &mut acc, "lib.rs", "struct Point {");

        let snapshot = builder().build_at(&buffers, &acc, at());
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json["status"], "context");
        assert_eq!(json["file_name"], "lib.rs");
        assert_eq!(json["construct"]["kind"], "struct");
        assert_eq!(json["construct"]["name"], "Point");
        assert_eq!(json["totals"]["chars_typed"], 0);
    }
}
