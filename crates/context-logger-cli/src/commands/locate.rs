//! Locate command implementation.

use anyhow::{bail, Context, Result};
use context_logger_core::{BufferDocument, LanguageId, TextDocument};
use std::path::Path;

use super::output;
use crate::OutputFormat;

/// Runs the locate command.
///
/// `line` is 1-indexed, as editors display it.
pub fn run(
    file: &Path,
    line: usize,
    language: Option<String>,
    format: OutputFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = super::load_config(config_path)?;
    let locator = config.locator(super::rule_table(&config)?);

    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let language = language.map_or_else(|| LanguageId::from_path(file), LanguageId::from);
    let doc = BufferDocument::new(file, language, text);

    if line == 0 || line > doc.line_count() {
        bail!(
            "Line {} is out of range: {} has {} line(s)",
            line,
            file.display(),
            doc.line_count()
        );
    }
    let doc = doc.with_cursor_line(line - 1);

    tracing::debug!("Locating {}:{} as {}", file.display(), line, doc.language_id());
    output::print_construct(&locator.locate_in(&doc), format)
}
