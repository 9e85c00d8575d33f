//! Setup-repo command implementation.

use anyhow::{Context, Result};
use context_logger_publish::Publisher;
use std::path::{Path, PathBuf};

/// Runs the setup-repo command.
pub fn run(dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let dir = dir.unwrap_or_else(|| config.publish.repo_dir());

    let publisher = Publisher::setup(&dir, &config.publish.html_file)
        .with_context(|| format!("Failed to set up {}", dir.display()))?;

    println!("Repository ready: {}", dir.display());
    println!("Log file: {}", publisher.log().path().display());
    println!("\nNext steps:");
    println!(
        "  1. Set `repo = \"{}\"` under [publish] in context-logger.toml",
        dir.display()
    );
    println!("  2. Run: context-logger watch --publish");

    Ok(())
}
