//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "context-logger.toml";

const DEFAULT_CONFIG: &str = r#"# context-logger configuration

[logger]
# Seconds between snapshots in `watch` mode
interval_secs = 5

# Lines above the cursor searched with the generic rules
max_prior_lines = 10

# "window": oldest line of the window first; "nearest": closest line first
scan_order = "window"

# Overrides the project name reported by the editor
# project_name = "my-project"

# Documents matching these globs are never tracked
exclude = [
    "**/target/**",
    "**/node_modules/**",
]

[publish]
# Git repository holding the HTML log (default: current directory)
# repo = "/path/to/log-repo"
html_file = "index.html"
commit_message = "Update index.html with latest logs"
push = true

# Publish on every snapshot tick
on_tick = true

# Publish the latest snapshot every N seconds
# auto_commit_secs = 1800

# Extra or overriding languages: kind = pattern (first capture group is the name)
# [languages.zig]
# function = 'fn\s+(\w+)\s*\('
# struct = 'const\s+(\w+)\s*=\s*struct'
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure logging and publishing");
    println!("  2. Run: context-logger setup-repo <DIR>");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_logger_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_defaults() {
        let parsed = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "# mine").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
