//! List languages command implementation.

use anyhow::Result;
use context_logger_core::{LanguageId, RuleSet};
use std::path::Path;

/// Runs the list-languages command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let table = super::rule_table(&config)?;

    println!("Languages:\n");
    println!("{:<12} Kinds", "Language");
    println!("{}", "-".repeat(60));

    for language in table.languages() {
        println!("{}", row(language, table.lookup(language)));
    }
    println!("{}", row(&LanguageId::generic(), table.generic()));

    println!("\nOther language ids use the generic rules.");
    println!("Add or override languages under [languages.<id>] in context-logger.toml.");
    Ok(())
}

fn row(language: &LanguageId, rules: &RuleSet) -> String {
    let kinds: Vec<&str> = rules.kinds().into_iter().map(|k| k.as_str()).collect();
    format!("{:<12} {}", language.as_str(), kinds.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_logger_core::RuleTable;

    #[test]
    fn row_lists_kinds_in_order() {
        let table = RuleTable::builtin().unwrap();
        let rust = LanguageId::new("rust");
        assert_eq!(
            row(&rust, table.lookup(&rust)),
            "rust         function, struct, impl"
        );
    }
}
