//! Replay command implementation.

use anyhow::{Context, Result};
use context_logger_core::{EditorEvent, Session, Snapshot};
use std::path::Path;

use super::output;
use crate::OutputFormat;

/// Runs the replay command.
pub fn run(events: &Path, publish: bool, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let mut session = super::session(&config)?;
    let publisher = publish.then(|| super::publisher(&config)).transpose()?;

    let content = std::fs::read_to_string(events)
        .with_context(|| format!("Failed to read {}", events.display()))?;
    let snapshots = replay_lines(&mut session, &content)
        .with_context(|| format!("Failed to replay {}", events.display()))?;

    for snapshot in &snapshots {
        output::print_snapshot(snapshot, format)?;
        if let Some(publisher) = &publisher {
            super::publish_logged(publisher, snapshot);
        }
    }

    tracing::info!("Replayed {} snapshot(s)", snapshots.len());
    Ok(())
}

/// Applies JSON-lines events in order, collecting the tick snapshots.
///
/// Blank lines are skipped; a malformed line is an error naming its number.
pub fn replay_lines(session: &mut Session, content: &str) -> Result<Vec<Snapshot>> {
    let mut snapshots = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event: EditorEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", index + 1))?;
        snapshots.extend(session.handle(&event));
    }
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_logger_core::Config;

    fn session() -> Session {
        crate::commands::session(&Config::default()).unwrap()
    }

    #[test]
    fn ticks_produce_snapshots() {
        let content = r#"
{"type":"tick"}
{"type":"open","path":"lib.rs","text":"impl Parser {\n    fn next(&mut self) {\n"}
{"type":"cursor","line":1}
{"type":"tick"}
"#;
        let snapshots = replay_lines(&mut session(), content).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0], Snapshot::NoActiveEditor);

        let ctx = snapshots[1].context().unwrap();
        assert_eq!(ctx.file_name, "lib.rs");
        assert_eq!(ctx.construct.to_string(), "function: next");
    }

    #[test]
    fn malformed_line_is_reported_with_number() {
        let content = "{\"type\":\"tick\"}\n{\"type\":\"explode\"}\n";
        let err = replay_lines(&mut session(), content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
