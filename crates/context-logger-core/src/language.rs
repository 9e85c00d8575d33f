//! Language identifiers used as rule table keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque identifier of a source language or dialect (e.g. `"python"`).
///
/// Only used as a lookup key into the [`RuleTable`](crate::RuleTable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(String);

impl LanguageId {
    /// Identifier of the universal fallback rule set.
    pub const GENERIC: &'static str = "generic";

    /// Creates a language id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the `generic` language id.
    #[must_use]
    pub fn generic() -> Self {
        Self(Self::GENERIC.to_string())
    }

    /// Infers a language id from a file extension.
    ///
    /// Unknown or missing extensions map to `generic`.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let id = match ext.as_str() {
            "py" | "pyw" => "python",
            "rs" => "rust",
            "js" | "mjs" | "cjs" => "javascript",
            "ts" | "mts" | "cts" => "typescript",
            "jsx" => "jsx",
            "tsx" => "tsx",
            "java" => "java",
            "html" | "htm" => "html",
            "css" => "css",
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
            "c" | "h" => "c",
            "go" => "go",
            "php" => "php",
            "rb" => "ruby",
            "swift" => "swift",
            "kt" | "kts" => "kotlin",
            _ => Self::GENERIC,
        };
        Self(id.to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the `generic` id.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.0 == Self::GENERIC
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LanguageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_known_extensions() {
        assert_eq!(LanguageId::from_path(Path::new("src/main.rs")).as_str(), "rust");
        assert_eq!(LanguageId::from_path(Path::new("app/views.py")).as_str(), "python");
        assert_eq!(LanguageId::from_path(Path::new("ui/App.TSX")).as_str(), "tsx");
        assert_eq!(LanguageId::from_path(Path::new("lib/util.h")).as_str(), "c");
        assert_eq!(LanguageId::from_path(Path::new("Main.kt")).as_str(), "kotlin");
    }

    #[test]
    fn unknown_extension_is_generic() {
        assert!(LanguageId::from_path(Path::new("build.zig")).is_generic());
        assert!(LanguageId::from_path(Path::new("Makefile")).is_generic());
    }
}
