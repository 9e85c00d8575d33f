//! The HTML log page: a searchable table, newest row first.

use crate::error::PublishError;
use context_logger_core::ContextSnapshot;
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Id of the `<tbody>` rows are inserted into.
pub const TABLE_ID: &str = "code-context-logs-table";

/// Column headers, in cell order.
pub const HEADERS: [&str; 8] = [
    "Project",
    "File",
    "Function",
    "Chars Typed",
    "Chars Deleted",
    "Words Added",
    "Words Deleted",
    "Date",
];

const INITIAL_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Code Context Logs</title>
    <style>
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #f2f2f2; position: sticky; top: 0; }
        input[type="text"] { width: 100%; padding: 12px; margin: 8px 0; box-sizing: border-box; }
        .search-container { margin-bottom: 10px; }
    </style>
</head>
<body>
    <h1>Code Context Logs</h1>

    <div class="search-container">
        <input type="text" id="searchInput" placeholder="Search logs..." onkeyup="filterLogs()">
    </div>

    <table>
        <thead>
            <tr>
                <th>Project</th>
                <th>File</th>
                <th>Function</th>
                <th>Chars Typed</th>
                <th>Chars Deleted</th>
                <th>Words Added</th>
                <th>Words Deleted</th>
                <th>Date</th>
            </tr>
        </thead>
        <tbody id="code-context-logs-table">
            <!-- LOGS -->
        </tbody>
    </table>

    <script>
        function filterLogs() {
            const filter = document.getElementById("searchInput").value.toLowerCase();
            const rows = document.getElementById("code-context-logs-table").getElementsByTagName("tr");
            for (const row of rows) {
                const text = (row.textContent || row.innerText).toLowerCase();
                row.style.display = text.includes(filter) ? "" : "none";
            }
        }
    </script>
</body>
</html>
"#;

/// One table row: the eight cells of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    cells: [String; 8],
}

impl LogRow {
    /// Builds a row from a structured snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &ContextSnapshot) -> Self {
        Self {
            cells: [
                snapshot.project_name.clone(),
                snapshot.file_name.clone(),
                snapshot.construct.to_string(),
                snapshot.totals.chars_typed.to_string(),
                snapshot.totals.chars_deleted.to_string(),
                snapshot.totals.words_added.to_string(),
                snapshot.totals.words_deleted.to_string(),
                snapshot.formatted_timestamp(),
            ],
        }
    }

    /// Parses a `Project: ..., File: ..., ...` text line.
    ///
    /// Each field keeps everything after its first `": "`, so the function
    /// cell reads `<kind>: <name>`. Fields past the eighth are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::MalformedLogLine`] if the line has fewer than
    /// eight fields or a field has no `Label: ` prefix.
    pub fn parse_legacy(line: &str) -> Result<Self, PublishError> {
        let fields: Vec<&str> = line.trim_end().split(", ").collect();
        if fields.len() < HEADERS.len() {
            return Err(PublishError::MalformedLogLine {
                reason: format!("expected {} fields, found {}", HEADERS.len(), fields.len()),
            });
        }

        let mut cells: [String; 8] = Default::default();
        for (cell, field) in cells.iter_mut().zip(&fields) {
            let (_, value) = field
                .split_once(": ")
                .ok_or_else(|| PublishError::MalformedLogLine {
                    reason: format!("field '{field}' has no label"),
                })?;
            *cell = value.to_string();
        }
        Ok(Self { cells })
    }

    /// Returns the raw (unescaped) cell values.
    #[must_use]
    pub fn cells(&self) -> &[String; 8] {
        &self.cells
    }

    /// Renders the row as an escaped `<tr>` element.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("\n            <tr>\n");
        for cell in &self.cells {
            let _ = writeln!(html, "                <td>{}</td>", escape(cell));
        }
        html.push_str("            </tr>");
        html
    }
}

impl From<&ContextSnapshot> for LogRow {
    fn from(snapshot: &ContextSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn tbody_regex() -> Option<&'static Regex> {
    static TBODY: OnceLock<Option<Regex>> = OnceLock::new();
    TBODY
        .get_or_init(|| Regex::new(r#"<tbody[^>]*\bid\s*=\s*"code-context-logs-table"[^>]*>"#).ok())
        .as_ref()
}

/// Inserts `row` as the first row of the log table.
///
/// Returns `None` if the page has no log table.
#[must_use]
pub fn insert_row(html: &str, row: &LogRow) -> Option<String> {
    let open_tag = tbody_regex()?.find(html)?;
    let mut out = String::with_capacity(html.len() + 512);
    out.push_str(&html[..open_tag.end()]);
    out.push_str(&row.to_html());
    out.push_str(&html[open_tag.end()..]);
    Some(out)
}

/// An HTML log file on disk.
#[derive(Debug, Clone)]
pub struct HtmlLog {
    path: PathBuf,
}

impl HtmlLog {
    /// Refers to the log file at `path`; nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the initial page unless the file already exists.
    ///
    /// Returns `true` if the file was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn create(&self) -> Result<bool, PublishError> {
        if self.path.exists() {
            debug!("{} already exists, leaving it untouched", self.path.display());
            return Ok(false);
        }
        std::fs::write(&self.path, INITIAL_HTML).map_err(|e| self.io_error(e))?;
        info!("Initialized {}", self.path.display());
        Ok(true)
    }

    /// Inserts a row at the top of the log table.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::TableNotFound`] (leaving the file untouched)
    /// if the page has no log table, or an IO error.
    pub fn prepend_row(&self, row: &LogRow) -> Result<(), PublishError> {
        let html = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let updated = insert_row(&html, row).ok_or_else(|| PublishError::TableNotFound {
            path: self.path.clone(),
            table_id: TABLE_ID,
        })?;
        std::fs::write(&self.path, updated).map_err(|e| self.io_error(e))?;
        debug!("Prepended row to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> PublishError {
        PublishError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use context_logger_core::{Construct, ConstructKind, MatchResult, TypingTotals};
    use tempfile::TempDir;

    const LINE: &str = "Project: shop, File: cart.ts, Function: method: addItem, Chars Typed: 12, \
                        Chars Deleted: 3, Words Added: 2, Words Deleted: 0, Date: 2024-05-02 14:03:11";

    fn row() -> LogRow {
        LogRow::parse_legacy(LINE).unwrap()
    }

    #[test]
    fn parse_legacy_keeps_kind_and_name() {
        let row = row();
        assert_eq!(row.cells()[0], "shop");
        assert_eq!(row.cells()[2], "method: addItem");
        assert_eq!(row.cells()[3], "12");
        assert_eq!(row.cells()[7], "2024-05-02 14:03:11");
    }

    #[test]
    fn parse_legacy_rejects_short_lines() {
        let err = LogRow::parse_legacy("No active editor found.").unwrap_err();
        assert!(matches!(err, PublishError::MalformedLogLine { .. }));
    }

    #[test]
    fn parse_legacy_rejects_unlabelled_fields() {
        let line = LINE.replace("File: cart.ts", "cart.ts");
        assert!(LogRow::parse_legacy(&line).is_err());
    }

    #[test]
    fn snapshot_row_matches_text_line() {
        let snapshot = ContextSnapshot {
            project_name: "shop".into(),
            file_name: "cart.ts".into(),
            construct: Construct::Found(MatchResult::new(ConstructKind::Method, "addItem")),
            totals: TypingTotals {
                chars_typed: 12,
                chars_deleted: 3,
                words_added: 2,
                words_deleted: 0,
            },
            timestamp: Local.with_ymd_and_hms(2024, 5, 2, 14, 3, 11).unwrap(),
        };
        assert_eq!(LogRow::from_snapshot(&snapshot), row());
        assert_eq!(LogRow::parse_legacy(&snapshot.to_string()).unwrap(), row());
    }

    #[test]
    fn cells_are_escaped() {
        let line = LINE.replace("shop", "<b>R&D</b>");
        let html = LogRow::parse_legacy(&line).unwrap().to_html();
        assert!(html.contains("<td>&lt;b&gt;R&amp;D&lt;/b&gt;</td>"));
        assert_eq!(html.matches("<td>").count(), 8);
    }

    #[test]
    fn insert_row_goes_first() {
        let first = row();
        let second = LogRow::parse_legacy(&LINE.replace("addItem", "removeItem")).unwrap();

        let html = insert_row(INITIAL_HTML, &first).unwrap();
        let html = insert_row(&html, &second).unwrap();

        let newer = html.find("removeItem").unwrap();
        let older = html.find("addItem").unwrap();
        assert!(newer < older);
        assert!(html.contains("<!-- LOGS -->"));
    }

    #[test]
    fn insert_row_requires_table() {
        assert!(insert_row("<html><body><table></table></body></html>", &row()).is_none());
    }

    #[test]
    fn create_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let log = HtmlLog::new(dir.path().join("index.html"));

        assert!(log.create().unwrap());
        std::fs::write(log.path(), "custom").unwrap();
        assert!(!log.create().unwrap());
        assert_eq!(std::fs::read_to_string(log.path()).unwrap(), "custom");
    }

    #[test]
    fn prepend_row_updates_file() {
        let dir = TempDir::new().unwrap();
        let log = HtmlLog::new(dir.path().join("index.html"));
        log.create().unwrap();

        log.prepend_row(&row()).unwrap();
        let html = std::fs::read_to_string(log.path()).unwrap();
        assert!(html.contains("<td>method: addItem</td>"));
        assert!(html.contains("<title>Code Context Logs</title>"));
    }

    #[test]
    fn missing_table_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<html></html>").unwrap();

        let err = HtmlLog::new(&path).prepend_row(&row()).unwrap_err();
        assert!(matches!(err, PublishError::TableNotFound { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
