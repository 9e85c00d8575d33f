//! Editor seam: the documents and events the core consumes.
//!
//! The host editor is external. The core only needs the two traits below
//! and the [`EditorEvent`] stream. [`Buffers`] is an in-memory
//! implementation kept current by applying events, used by the CLI and by
//! tests.

use crate::language::LanguageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A text document as seen by the snapshot builder.
pub trait TextDocument {
    /// Stable key of the document (its path).
    fn path(&self) -> &Path;

    /// Language of the document.
    fn language_id(&self) -> &LanguageId;

    /// Text of line `n` (0-indexed), without the line terminator.
    fn line_at(&self, n: usize) -> Option<&str>;

    /// Number of lines.
    fn line_count(&self) -> usize;

    /// Line the cursor is on (0-indexed).
    fn cursor_line(&self) -> usize;
}

/// The editor session collaborator.
pub trait EditorSession {
    /// The focused document, if any.
    fn active_document(&self) -> Option<&dyn TextDocument>;

    /// Name of the open project or workspace, if known.
    fn project_name(&self) -> Option<&str>;
}

/// One edit within a change notification.
///
/// Offsets and lengths count `char`s of the document text before the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Start of the replaced range.
    #[serde(alias = "rangeOffset")]
    pub range_offset: usize,
    /// Length of the replaced range.
    #[serde(alias = "rangeLength")]
    pub range_length: usize,
    /// Replacement text.
    #[serde(alias = "text", default)]
    pub inserted_text: String,
}

impl TextEdit {
    /// Creates a new edit.
    #[must_use]
    pub fn new(range_offset: usize, range_length: usize, inserted_text: impl Into<String>) -> Self {
        Self {
            range_offset,
            range_length,
            inserted_text: inserted_text.into(),
        }
    }

    /// Pure insertion at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    /// Pure deletion of `length` chars at `offset`.
    #[must_use]
    pub fn delete(offset: usize, length: usize) -> Self {
        Self::new(offset, length, "")
    }
}

/// An event from the editor host.
///
/// Serialized as one JSON object per line, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditorEvent {
    /// A document was opened (and focused).
    Open {
        /// Document path.
        path: PathBuf,
        /// Language id; inferred from the extension when absent.
        #[serde(default)]
        language: Option<LanguageId>,
        /// Initial full text.
        #[serde(default)]
        text: String,
    },
    /// A batch of edits was applied.
    Change {
        /// Document path.
        path: PathBuf,
        /// Full text after the batch.
        text: String,
        /// Edits in the order the editor applied them.
        #[serde(default)]
        edits: Vec<TextEdit>,
    },
    /// A document was closed.
    Close {
        /// Document path.
        path: PathBuf,
    },
    /// A document gained focus, with the cursor on `line`.
    Focus {
        /// Document path.
        path: PathBuf,
        /// Cursor line (0-indexed).
        #[serde(default)]
        line: usize,
    },
    /// The cursor moved within the focused document.
    Cursor {
        /// Cursor line (0-indexed).
        line: usize,
    },
    /// Request for a snapshot.
    Tick,
}

impl EditorEvent {
    /// Returns the document path this event refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. }
            | Self::Change { path, .. }
            | Self::Close { path }
            | Self::Focus { path, .. } => Some(path),
            Self::Cursor { .. } | Self::Tick => None,
        }
    }
}

/// An open document held in memory.
#[derive(Debug, Clone)]
pub struct BufferDocument {
    path: PathBuf,
    language: LanguageId,
    text: String,
    line_starts: Vec<usize>,
    cursor_line: usize,
}

impl BufferDocument {
    /// Creates a document with the cursor on the first line.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, language: LanguageId, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = index_lines(&text);
        Self {
            path: path.into(),
            language,
            text,
            line_starts,
            cursor_line: 0,
        }
    }

    /// Sets the cursor line, clamped to the last line.
    #[must_use]
    pub fn with_cursor_line(mut self, line: usize) -> Self {
        self.set_cursor_line(line);
        self
    }

    /// Returns the full text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the full text, keeping the cursor in range.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.line_starts = index_lines(&self.text);
        self.set_cursor_line(self.cursor_line);
    }

    /// Moves the cursor, clamped to the last line.
    pub fn set_cursor_line(&mut self, line: usize) {
        self.cursor_line = line.min(self.line_starts.len().saturating_sub(1));
    }
}

impl TextDocument for BufferDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn language_id(&self) -> &LanguageId {
        &self.language
    }

    fn line_at(&self, n: usize) -> Option<&str> {
        let start = *self.line_starts.get(n)?;
        let end = self
            .line_starts
            .get(n + 1)
            .map_or(self.text.len(), |next| next - 1);
        let line = &self.text[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn cursor_line(&self) -> usize {
        self.cursor_line
    }
}

fn index_lines(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// In-memory editor state driven by [`EditorEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct Buffers {
    documents: HashMap<PathBuf, BufferDocument>,
    active: Option<PathBuf>,
    project_name: Option<String>,
}

impl Buffers {
    /// Creates an empty editor state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project name reported to snapshots.
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Opens (or replaces) a document and focuses it.
    pub fn open(&mut self, doc: BufferDocument) {
        let path = doc.path.clone();
        self.documents.insert(path.clone(), doc);
        self.active = Some(path);
    }

    /// Returns an open document.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&BufferDocument> {
        self.documents.get(path)
    }

    /// Returns the path of the focused document.
    #[must_use]
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    /// Number of open documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no document is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Applies an editor event to the buffer state.
    pub fn apply(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::Open {
                path,
                language,
                text,
            } => {
                let language = language
                    .clone()
                    .unwrap_or_else(|| LanguageId::from_path(path));
                debug!("Opened {} as {}", path.display(), language);
                self.open(BufferDocument::new(path.clone(), language, text.clone()));
            }
            EditorEvent::Change { path, text, .. } => match self.documents.get_mut(path) {
                Some(doc) => doc.set_text(text.clone()),
                None => {
                    let language = LanguageId::from_path(path);
                    self.documents
                        .insert(path.clone(), BufferDocument::new(path.clone(), language, text.clone()));
                }
            },
            EditorEvent::Close { path } => {
                self.documents.remove(path);
                if self.active.as_deref() == Some(path.as_path()) {
                    self.active = None;
                }
            }
            EditorEvent::Focus { path, line } => {
                if let Some(doc) = self.documents.get_mut(path) {
                    doc.set_cursor_line(*line);
                    self.active = Some(path.clone());
                } else {
                    debug!("Ignoring focus on unopened document {}", path.display());
                }
            }
            EditorEvent::Cursor { line } => {
                if let Some(doc) = self
                    .active
                    .as_ref()
                    .and_then(|p| self.documents.get_mut(p))
                {
                    doc.set_cursor_line(*line);
                }
            }
            EditorEvent::Tick => {}
        }
    }
}

impl EditorSession for Buffers {
    fn active_document(&self) -> Option<&dyn TextDocument> {
        self.active
            .as_ref()
            .and_then(|p| self.documents.get(p))
            .map(|d| d as &dyn TextDocument)
    }

    fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }
}
