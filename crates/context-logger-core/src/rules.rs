//! Per-language heuristic pattern rules.
//!
//! A [`RuleTable`] maps a [`LanguageId`] to a [`RuleSet`]: an ordered list of
//! single-line patterns, each recognising one [`ConstructKind`]. The
//! distinguished `generic` set is the universal fallback and is never empty.
//!
//! Every pattern is compiled when the table is built, so a malformed pattern
//! surfaces as a [`RuleTableError`] at startup rather than mid-scan.

use crate::language::LanguageId;
use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Kind of syntactic construct a rule recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructKind {
    /// Free function or arrow function.
    Function,
    /// Class declaration.
    Class,
    /// Method inside a class or object.
    Method,
    /// Struct / record declaration.
    Struct,
    /// Interface declaration.
    Interface,
    /// Enum declaration.
    Enum,
    /// Markup tag.
    Tag,
    /// Stylesheet selector.
    Selector,
    /// Stylesheet `@media` block.
    Media,
    /// Rust `impl` block.
    Impl,
}

impl ConstructKind {
    /// All kinds in canonical order.
    pub const ALL: [Self; 10] = [
        Self::Function,
        Self::Class,
        Self::Method,
        Self::Struct,
        Self::Interface,
        Self::Enum,
        Self::Tag,
        Self::Selector,
        Self::Media,
        Self::Impl,
    ];

    /// Returns the lowercase name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Tag => "tag",
            Self::Selector => "selector",
            Self::Media => "media",
            Self::Impl => "impl",
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstructKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A construct recognised on a line: its kind and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Kind of the matched construct.
    pub kind: ConstructKind,
    /// Captured identifier, or `Unnamed <kind>` if nothing was captured.
    pub name: String,
}

impl MatchResult {
    /// Creates a new match result.
    #[must_use]
    pub fn new(kind: ConstructKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Returns the placeholder name used when no identifier was captured.
    #[must_use]
    pub fn placeholder_name(kind: ConstructKind) -> String {
        format!("Unnamed {kind}")
    }

    /// Returns true if the name is the kind-qualified placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.name == Self::placeholder_name(self.kind)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.name)
    }
}

/// A single compiled pattern for one construct kind.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: ConstructKind,
    pattern: Regex,
}

impl Rule {
    /// Returns the construct kind this rule recognises.
    #[must_use]
    pub fn kind(&self) -> ConstructKind {
        self.kind
    }

    /// Returns the source text of the pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Applies the rule to one line of source text.
    ///
    /// The first non-empty capture group, in declaration order, is the name.
    /// Blank lines never match.
    #[must_use]
    pub fn apply(&self, line: &str) -> Option<MatchResult> {
        if line.trim().is_empty() {
            return None;
        }
        let caps = self.pattern.captures(line)?;
        let name = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .find(|s| !s.is_empty())
            .map_or_else(|| MatchResult::placeholder_name(self.kind), str::to_string);
        Some(MatchResult::new(self.kind, name))
    }
}

/// Ordered rules for one language.
#[derive(Debug, Clone)]
pub struct RuleSet {
    language: LanguageId,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Returns the language this set belongs to.
    #[must_use]
    pub fn language(&self) -> &LanguageId {
        &self.language
    }

    /// Iterates rules in their fixed order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Returns the kinds this set defines, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ConstructKind> {
        self.rules.iter().map(Rule::kind).collect()
    }

    /// Returns the rule for a kind, if the language defines one.
    #[must_use]
    pub fn get(&self, kind: ConstructKind) -> Option<&Rule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    /// Returns the first rule (in order) that matches the line.
    #[must_use]
    pub fn first_match(&self, line: &str) -> Option<MatchResult> {
        self.rules.iter().find_map(|r| r.apply(line))
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Errors raised while building a [`RuleTable`].
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum RuleTableError {
    /// A pattern failed to compile.
    #[error("invalid {kind} pattern for language `{language}`: `{pattern}`")]
    #[diagnostic(
        code(context_logger::rules::invalid_pattern),
        help("patterns use the `regex` crate syntax; literal braces must be escaped")
    )]
    InvalidPattern {
        /// Language the pattern belongs to.
        language: String,
        /// Kind the pattern recognises.
        kind: ConstructKind,
        /// The offending pattern text.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    /// A configured kind name is not a known construct kind.
    #[error("unknown construct kind `{kind}` for language `{language}`")]
    #[diagnostic(
        code(context_logger::rules::unknown_kind),
        help("expected one of: function, class, method, struct, interface, enum, tag, selector, media, impl")
    )]
    UnknownKind {
        /// Language the entry belongs to.
        language: String,
        /// The unrecognised kind name.
        kind: String,
    },

    /// The generic fallback set ended up without rules.
    #[error("the generic rule set must define at least one pattern")]
    #[diagnostic(code(context_logger::rules::empty_generic))]
    EmptyGeneric,
}

/// Immutable mapping from language to rule set, with a generic fallback.
#[derive(Debug, Clone)]
pub struct RuleTable {
    languages: HashMap<LanguageId, RuleSet>,
    generic: RuleSet,
}

impl RuleTable {
    /// Builds the table from the built-in rule definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern fails to compile.
    pub fn builtin() -> Result<Self, RuleTableError> {
        RuleTableBuilder::with_builtin().build()
    }

    /// Creates a builder seeded with the built-in definitions.
    #[must_use]
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::with_builtin()
    }

    /// Returns the rule set for a language, or the generic set.
    #[must_use]
    pub fn lookup(&self, language: &LanguageId) -> &RuleSet {
        self.languages.get(language).unwrap_or(&self.generic)
    }

    /// Returns the generic fallback rule set.
    #[must_use]
    pub fn generic(&self) -> &RuleSet {
        &self.generic
    }

    /// Returns true if a language-specific set exists.
    #[must_use]
    pub fn has_language(&self, language: &LanguageId) -> bool {
        self.languages.contains_key(language)
    }

    /// Returns all language-specific ids, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<&LanguageId> {
        let mut ids: Vec<&LanguageId> = self.languages.keys().collect();
        ids.sort();
        ids
    }
}

/// Builder for a [`RuleTable`].
///
/// Definitions are kept as text until [`build`](Self::build), which compiles
/// every pattern eagerly.
#[derive(Debug, Clone, Default)]
pub struct RuleTableBuilder {
    definitions: Vec<(LanguageId, Vec<(ConstructKind, String)>)>,
}

impl RuleTableBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with the built-in definitions.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut builder = Self::new();
        for (language, rules) in BUILTIN_RULES {
            for (kind, pattern) in *rules {
                builder.set(&LanguageId::new(*language), *kind, pattern);
            }
        }
        builder
    }

    /// Sets (or replaces) the pattern of one kind for a language.
    ///
    /// An empty pattern removes the kind from that language.
    #[must_use]
    pub fn rule(mut self, language: impl Into<LanguageId>, kind: ConstructKind, pattern: &str) -> Self {
        self.set(&language.into(), kind, pattern);
        self
    }

    /// Sets patterns from textual kind names, as found in configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a kind name is not a known construct kind.
    pub fn rules_from_names<'a, I>(
        mut self,
        language: impl Into<LanguageId>,
        entries: I,
    ) -> Result<Self, RuleTableError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let language = language.into();
        let mut parsed = entries
            .into_iter()
            .map(|(name, pattern)| {
                name.parse::<ConstructKind>()
                    .map(|kind| (kind, pattern))
                    .map_err(|kind| RuleTableError::UnknownKind {
                        language: language.to_string(),
                        kind,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        parsed.sort_by_key(|(kind, _)| *kind);

        for (kind, pattern) in parsed {
            self.set(&language, kind, pattern);
        }
        Ok(self)
    }

    fn set(&mut self, language: &LanguageId, kind: ConstructKind, pattern: &str) {
        let index = match self.definitions.iter().position(|(id, _)| id == language) {
            Some(i) => i,
            None => {
                self.definitions.push((language.clone(), Vec::new()));
                self.definitions.len() - 1
            }
        };
        let rules = &mut self.definitions[index].1;

        if pattern.is_empty() {
            rules.retain(|(k, _)| *k != kind);
            return;
        }
        match rules.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = pattern.to_string(),
            None => rules.push((kind, pattern.to_string())),
        }
    }

    /// Compiles every pattern and builds the table.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern fails to compile or if the generic
    /// set is empty.
    pub fn build(self) -> Result<RuleTable, RuleTableError> {
        let mut languages = HashMap::new();
        let mut generic = None;

        for (language, definitions) in self.definitions {
            let rules = definitions
                .into_iter()
                .map(|(kind, pattern)| {
                    Regex::new(&pattern)
                        .map(|compiled| Rule {
                            kind,
                            pattern: compiled,
                        })
                        .map_err(|source| RuleTableError::InvalidPattern {
                            language: language.to_string(),
                            kind,
                            pattern,
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let set = RuleSet {
                language: language.clone(),
                rules,
            };
            if language.is_generic() {
                generic = Some(set);
            } else if !set.is_empty() {
                languages.insert(language, set);
            }
        }

        let generic = generic
            .filter(|set| !set.is_empty())
            .ok_or(RuleTableError::EmptyGeneric)?;

        debug!(
            "Built rule table: {} languages, {} generic rules",
            languages.len(),
            generic.len()
        );

        Ok(RuleTable { languages, generic })
    }
}

use ConstructKind::{Class, Enum, Function, Impl, Interface, Media, Method, Selector, Struct, Tag};

const JS_FUNCTION: &str = r"(?:function\s+(\w+)\s*\(|(?:const|let|var)\s+(\w+)\s*=\s*(?:\(.*\)\s*=>|\(.*\)\s*=>\s*\{)|\s+(\w+)\s*=\s*async\s*\(.*\)\s*=>|\w+\s*=\s*\(.*\)\s*=>\s*\{)";
const JS_CLASS: &str = r"class\s+(\w+)\s*\{";
const JS_METHOD: &str = r"(\w+)\s*\(([^)]*)\)\s*\{";
const JAVA_MEMBER: &str = r"(?:public|private|protected)\s+(?:static\s+)?\w+\s+(\w+)\s*\(";

/// Built-in definitions, in per-language kind order.
const BUILTIN_RULES: &[(&str, &[(ConstructKind, &str)])] = &[
    ("javascript", &[(Function, JS_FUNCTION), (Class, JS_CLASS), (Method, JS_METHOD)]),
    ("typescript", &[(Function, JS_FUNCTION), (Class, JS_CLASS), (Method, JS_METHOD)]),
    ("jsx", &[(Function, JS_FUNCTION), (Class, JS_CLASS), (Method, JS_METHOD)]),
    ("tsx", &[(Function, JS_FUNCTION), (Class, JS_CLASS), (Method, JS_METHOD)]),
    (
        "python",
        &[
            (Function, r"def\s+(\w+)\s*\(|@\w+\s*\n\s*def\s+(\w+)\s*\("),
            (Class, r"class\s+(\w+)\s*[(:]"),
            (Method, r"def\s+(\w+)\s*\("),
        ],
    ),
    (
        "java",
        &[
            (Function, JAVA_MEMBER),
            (Method, JAVA_MEMBER),
            (Class, r"class\s+(\w+)\s*\{"),
            (Interface, r"interface\s+(\w+)\s*\{"),
            (Enum, r"enum\s+(\w+)\s*\{"),
        ],
    ),
    ("html", &[(Tag, r"<(\w+)(\s+[^>]*)?>")]),
    (
        "css",
        &[
            (Selector, r"([.#]?[\w-]+)\s*\{"),
            (Media, r"@media\s+([^{]+)\s*\{"),
        ],
    ),
    (
        "rust",
        &[
            (Function, r"fn\s+(\w+)\s*\("),
            (Struct, r"struct\s+(\w+)\s*\{"),
            (Impl, r"impl\s+(\w+)"),
        ],
    ),
    (
        "cpp",
        &[
            (Function, r"(?:\w+\s+)?(?:\*|&)?\s*(\w+)\s*\(([^)]*)\)\s*(?:const)?\s*\{"),
            (Class, r"class\s+(\w+)\s*\{"),
            (Struct, r"struct\s+(\w+)\s*\{"),
        ],
    ),
    (
        "c",
        &[
            (Function, r"(?:\w+\s+)?(?:\*|&)?\s*(\w+)\s*\(([^)]*)\)\s*\{"),
            (Struct, r"struct\s+(\w+)\s*\{"),
        ],
    ),
    (
        "go",
        &[
            (Function, r"func\s+(\w+)\s*\("),
            (Struct, r"type\s+(\w+)\s+struct\s*\{"),
        ],
    ),
    (
        "php",
        &[
            (Function, r"function\s+(\w+)\s*\("),
            (Class, r"class\s+(\w+)\s*\{"),
        ],
    ),
    (
        "ruby",
        &[(Method, r"def\s+(\w+)"), (Class, r"class\s+(\w+)")],
    ),
    (
        "swift",
        &[
            (Function, r"func\s+(\w+)\s*\("),
            (Class, r"class\s+(\w+)\s*\{"),
            (Struct, r"struct\s+(\w+)\s*\{"),
            (Enum, r"enum\s+(\w+)\s*\{"),
        ],
    ),
    (
        "kotlin",
        &[
            (Function, r"fun\s+(\w+)\s*\("),
            (Class, r"class\s+(\w+)\s*\{"),
        ],
    ),
    (
        LanguageId::GENERIC,
        &[
            // The call-shaped alternative only fires at line start, so
            // keyword-introduced declarations (`fn`, `func`, ...) fall through.
            (Function, r"function\s+(\w+)\s*\(|^\s*(\w+)\s*\([^)]*\)\s*\{"),
            (Class, r"class\s+(\w+)\s*\{"),
            (Struct, r"struct\s+(\w+)\s*\{"),
            (Tag, r"<(\w+)\s*[^>]*>"),
            (Selector, r"([.#]?[\w-]+)\s*\{"),
        ],
    ),
];
