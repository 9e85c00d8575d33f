//! Per-document typing activity counters.
//!
//! Word counts are a heuristic: whitespace-separated tokens of the replaced
//! range versus the inserted text, not a tokenizer-aware diff.

use crate::editor::{EditorEvent, TextEdit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// The four counters, without the tracked content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingTotals {
    /// Characters typed.
    pub chars_typed: usize,
    /// Characters deleted.
    pub chars_deleted: usize,
    /// Words added.
    pub words_added: usize,
    /// Words deleted.
    pub words_deleted: usize,
}

/// Counters for one open document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCounters {
    /// Characters typed.
    pub chars_typed: usize,
    /// Characters deleted.
    pub chars_deleted: usize,
    /// Words added.
    pub words_added: usize,
    /// Words deleted.
    pub words_deleted: usize,
    /// Full text as of the last notification.
    pub last_content: String,
}

impl ActivityCounters {
    /// Zeroed counters tracking `initial` as the current content.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            last_content: initial.into(),
            ..Self::default()
        }
    }

    /// Returns the counters without the content.
    #[must_use]
    pub fn totals(&self) -> TypingTotals {
        TypingTotals {
            chars_typed: self.chars_typed,
            chars_deleted: self.chars_deleted,
            words_added: self.words_added,
            words_deleted: self.words_deleted,
        }
    }

    /// Returns true if every counter is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.totals() == TypingTotals::default()
    }

    fn apply_batch(&mut self, full_text_after: &str, edits: &[TextEdit]) {
        // Every edit in the batch is measured against the pre-batch content.
        let before = self.last_content.as_str();
        let mut delta = TypingTotals::default();

        for edit in edits {
            let inserted_len = edit.inserted_text.chars().count();
            delta.chars_typed += inserted_len.saturating_sub(edit.range_length);
            delta.chars_deleted += edit.range_length.saturating_sub(inserted_len);

            let old_words = char_slice(before, edit.range_offset, edit.range_length)
                .split_whitespace()
                .count();
            let new_words = edit.inserted_text.split_whitespace().count();
            delta.words_added += new_words.saturating_sub(old_words);
            delta.words_deleted += old_words.saturating_sub(new_words);
        }

        self.chars_typed += delta.chars_typed;
        self.chars_deleted += delta.chars_deleted;
        self.words_added += delta.words_added;
        self.words_deleted += delta.words_deleted;
        self.last_content = full_text_after.to_string();
    }
}

/// Returns the substring covering `len` chars from char `offset`, clamped
/// to the text.
fn char_slice(text: &str, offset: usize, len: usize) -> &str {
    let start = byte_offset(text, offset);
    let rest = &text[start..];
    &rest[..byte_offset(rest, len)]
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Typing activity store keyed by document path.
///
/// Entries are created on open, updated on every change notification and
/// dropped on close.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    entries: HashMap<PathBuf, ActivityCounters>,
}

impl Accumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) tracking a document.
    pub fn on_open(&mut self, key: impl Into<PathBuf>, initial_content: impl Into<String>) {
        let key = key.into();
        if self.entries.contains_key(&key) {
            debug!("Resetting counters for reopened {}", key.display());
        }
        self.entries
            .insert(key, ActivityCounters::new(initial_content));
    }

    /// Applies one change notification.
    ///
    /// An unknown key is first opened with empty content.
    pub fn on_change(&mut self, key: &Path, full_text_after: &str, edits: &[TextEdit]) {
        let counters = self.entries.entry(key.to_path_buf()).or_insert_with(|| {
            debug!("Implicitly opening {} on change", key.display());
            ActivityCounters::default()
        });
        counters.apply_batch(full_text_after, edits);
        trace!("{}: {:?}", key.display(), counters.totals());
    }

    /// Stops tracking a document and discards its counters.
    pub fn on_close(&mut self, key: &Path) {
        if self.entries.remove(key).is_some() {
            debug!("Discarded counters for {}", key.display());
        }
    }

    /// Returns the counters for a document, or zeroed counters.
    #[must_use]
    pub fn read(&self, key: &Path) -> ActivityCounters {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    /// Returns true if the document is tracked.
    #[must_use]
    pub fn is_tracking(&self, key: &Path) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of tracked documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Routes a lifecycle or change event; other events are ignored.
    pub fn apply(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::Open { path, text, .. } => self.on_open(path.clone(), text.clone()),
            EditorEvent::Change { path, text, edits } => self.on_change(path, text, edits),
            EditorEvent::Close { path } => self.on_close(path),
            EditorEvent::Focus { .. } | EditorEvent::Cursor { .. } | EditorEvent::Tick => {}
        }
    }
}
