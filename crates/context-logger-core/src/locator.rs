//! Construct locator: which function/class/... encloses the cursor.
//!
//! Search order, first match wins:
//!
//! 1. The current line, then the previous line, then the next line, each
//!    tried against every rule of the language's [`RuleSet`](crate::RuleSet)
//!    in its fixed order.
//! 2. Up to `max_prior_lines` lines above the cursor, tried against the
//!    **generic** rules only. By default the window is scanned from its
//!    oldest line toward the cursor ([`ScanOrder::Window`]).
//! 3. Otherwise [`Construct::Unknown`].

use crate::editor::TextDocument;
use crate::language::LanguageId;
use crate::rules::{MatchResult, RuleSet, RuleTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default number of lines above the cursor scanned by the fallback phase.
pub const DEFAULT_MAX_PRIOR_LINES: usize = 10;

/// Text shown when no construct could be located.
pub const UNKNOWN_CONSTRUCT: &str = "Unknown Function/Class";

/// Order in which the fallback phase walks the lines above the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrder {
    /// Oldest line of the window first, moving toward the cursor.
    #[default]
    Window,
    /// Line directly above the cursor first, moving upward.
    Nearest,
}

/// Outcome of a locate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Construct {
    /// A rule matched.
    Found(MatchResult),
    /// Nothing matched.
    Unknown,
}

impl Construct {
    /// Returns the match, if any.
    #[must_use]
    pub fn as_match(&self) -> Option<&MatchResult> {
        match self {
            Self::Found(m) => Some(m),
            Self::Unknown => None,
        }
    }

    /// Returns true if nothing matched.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<Option<MatchResult>> for Construct {
    fn from(m: Option<MatchResult>) -> Self {
        m.map_or(Self::Unknown, Self::Found)
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(m) => write!(f, "{m}"),
            Self::Unknown => f.write_str(UNKNOWN_CONSTRUCT),
        }
    }
}

/// Applies a [`RuleTable`] around a cursor position.
#[derive(Debug, Clone)]
pub struct ConstructLocator {
    table: Arc<RuleTable>,
    max_prior_lines: usize,
    scan_order: ScanOrder,
}

impl ConstructLocator {
    /// Creates a locator with the default window size and scan order.
    #[must_use]
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self {
            table,
            max_prior_lines: DEFAULT_MAX_PRIOR_LINES,
            scan_order: ScanOrder::default(),
        }
    }

    /// Sets how many lines above the cursor the fallback phase may scan.
    #[must_use]
    pub fn with_max_prior_lines(mut self, max: usize) -> Self {
        self.max_prior_lines = max;
        self
    }

    /// Sets the fallback scan order.
    #[must_use]
    pub fn with_scan_order(mut self, order: ScanOrder) -> Self {
        self.scan_order = order;
        self
    }

    /// Returns the underlying rule table.
    #[must_use]
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Locates the construct around a cursor line.
    ///
    /// `prior_lines` yields the lines above the cursor, nearest first; it is
    /// only consumed when the adjacent-line phase finds nothing, and never
    /// beyond `max_prior_lines`.
    pub fn locate<'a, I>(
        &self,
        language: &LanguageId,
        current: &str,
        previous: Option<&str>,
        next: Option<&str>,
        prior_lines: I,
    ) -> Construct
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rules = self.table.lookup(language);

        let candidates = std::iter::once(current).chain(previous).chain(next);
        for line in candidates {
            if let Some(found) = rules.first_match(line) {
                debug!("{} matched near cursor: {}", rules.language(), found);
                return Construct::Found(found);
            }
        }

        trace!("No match near cursor, scanning prior lines with generic rules");
        self.scan_prior(self.table.generic(), prior_lines).into()
    }

    /// Locates the construct at a document's cursor.
    pub fn locate_in(&self, doc: &dyn TextDocument) -> Construct {
        let cursor = doc.cursor_line();
        let current = doc.line_at(cursor).unwrap_or_default();
        let previous = cursor.checked_sub(1).and_then(|n| doc.line_at(n));
        let next = doc.line_at(cursor + 1);
        let prior = (0..cursor).rev().filter_map(|n| doc.line_at(n));

        self.locate(doc.language_id(), current, previous, next, prior)
    }

    fn scan_prior<'a, I>(&self, generic: &RuleSet, prior_lines: I) -> Option<MatchResult>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut window = prior_lines.into_iter().take(self.max_prior_lines);
        let found = match self.scan_order {
            ScanOrder::Window => {
                let lines: Vec<&str> = window.collect();
                lines.into_iter().rev().find_map(|line| generic.first_match(line))
            }
            ScanOrder::Nearest => window.find_map(|line| generic.first_match(line)),
        };
        if let Some(m) = &found {
            debug!("Prior-line scan matched: {}", m);
        }
        found
    }
}
