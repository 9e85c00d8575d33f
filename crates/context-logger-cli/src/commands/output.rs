//! Shared output formatting for snapshots and constructs.

use anyhow::Result;
use context_logger_core::{Construct, Snapshot};
use serde::Serialize;

use crate::OutputFormat;

/// Print a snapshot in the specified format.
pub fn print_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<()> {
    println!("{}", render(snapshot, format)?);
    Ok(())
}

/// Print a located construct in the specified format.
pub fn print_construct(construct: &Construct, format: OutputFormat) -> Result<()> {
    println!("{}", render(construct, format)?);
    Ok(())
}

fn render<T>(value: &T, format: OutputFormat) -> Result<String>
where
    T: Serialize + std::fmt::Display,
{
    Ok(match format {
        OutputFormat::Text => value.to_string(),
        OutputFormat::Json => serde_json::to_string(value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_logger_core::{ConstructKind, MatchResult};

    #[test]
    fn text_uses_display() {
        let construct = Construct::Found(MatchResult::new(ConstructKind::Class, "Cart"));
        assert_eq!(render(&construct, OutputFormat::Text).unwrap(), "class: Cart");
        assert_eq!(
            render(&Snapshot::NoActiveEditor, OutputFormat::Text).unwrap(),
            "No active editor found."
        );
    }

    #[test]
    fn json_is_one_line() {
        let construct = Construct::Found(MatchResult::new(ConstructKind::Class, "Cart"));
        assert_eq!(
            render(&construct, OutputFormat::Json).unwrap(),
            r#"{"status":"found","kind":"class","name":"Cart"}"#
        );
        assert_eq!(
            render(&Construct::Unknown, OutputFormat::Json).unwrap(),
            r#"{"status":"unknown"}"#
        );
        assert_eq!(
            render(&Snapshot::NoActiveEditor, OutputFormat::Json).unwrap(),
            r#"{"status":"no_active_editor"}"#
        );
    }
}
