//! Serde data structures for the reportgate configuration file.
//!
//! Contains [`Config`] (the root), [`FilterConfig`], [`NoiseRules`], and
//! [`Pattern`]. All types derive `Serialize` and `Deserialize` with
//! `deny_unknown_fields` for strict parsing. Omitted sections fall back
//! to the built-in noise signatures.

use serde::{Deserialize, Serialize};

/// A message or URL pattern. Text matches by substring, regex by search.
///
/// Written as a single-key map in every format: `{ text: ... }` or
/// `{ regex: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "PatternEntry", into = "PatternEntry")]
pub enum Pattern {
    Text(String),
    Regex(String),
}

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct PatternEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    regex: Option<String>,
}

impl TryFrom<PatternEntry> for Pattern {
    type Error = &'static str;

    fn try_from(entry: PatternEntry) -> Result<Self, Self::Error> {
        match (entry.text, entry.regex) {
            (Some(text), None) => Ok(Self::Text(text)),
            (None, Some(regex)) => Ok(Self::Regex(regex)),
            (Some(_), Some(_)) => Err("a pattern takes either `text` or `regex`, not both"),
            (None, None) => Err("a pattern needs a `text` or `regex` key"),
        }
    }
}

impl From<Pattern> for PatternEntry {
    fn from(pattern: Pattern) -> Self {
        match pattern {
            Pattern::Text(text) => Self {
                text: Some(text),
                regex: None,
            },
            Pattern::Regex(regex) => Self {
                text: None,
                regex: Some(regex),
            },
        }
    }
}

impl Pattern {
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[must_use]
    pub fn regex(s: impl Into<String>) -> Self {
        Self::Regex(s.into())
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Regex(s) => write!(f, "/{s}/"),
        }
    }
}

fn default_ignore_errors() -> Vec<Pattern> {
    vec![
        // Raised by sandboxed user code
        Pattern::text("Custom Object"),
        Pattern::text("TypeScript Server Error"),
        // Editor cancellation of running actions
        Pattern::regex("^Canceled$"),
        // Browser extensions
        Pattern::regex("(?i)extensions/"),
        Pattern::regex("(?i)^chrome://"),
        // React devtools store bookkeeping
        Pattern::regex("because a node with that id is already in the Store"),
        Pattern::regex(r"Node \d* was removed before its children\."),
        Pattern::regex(
            r"Cannot remove node \d* because no matching node was found in the Store\.",
        ),
        Pattern::regex(
            r"Cannot add child \d* to parent \d* because parent node was not found in the Store\.",
        ),
        Pattern::regex(r"Children cannot be added or removed during a reorder operation\."),
        // Safari only, harmless
        Pattern::text("undefined is not an object (evaluating 'window.__pad.performLoop')"),
    ]
}

fn is_default_ignore_errors(v: &[Pattern]) -> bool {
    v == default_ignore_errors().as_slice()
}

fn is_default_noise(v: &NoiseRules) -> bool {
    *v == NoiseRules::default()
}

fn is_default_filter(v: &FilterConfig) -> bool {
    *v == FilterConfig::default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Overrides the release tag baked in at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,

    #[serde(default, skip_serializing_if = "is_default_filter")]
    pub filter: FilterConfig,
}

impl Config {
    #[must_use]
    pub fn release(&self) -> &str {
        self.release.as_deref().unwrap_or(crate::RELEASE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(
        default = "default_ignore_errors",
        skip_serializing_if = "is_default_ignore_errors"
    )]
    pub ignore_errors: Vec<Pattern>,

    /// When non-empty, events whose source URL matches none of these are dropped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow_urls: Vec<Pattern>,

    /// Checked before `allow_urls`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny_urls: Vec<Pattern>,

    #[serde(default, skip_serializing_if = "is_default_noise")]
    pub noise: NoiseRules,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_errors: default_ignore_errors(),
            allow_urls: Vec::new(),
            deny_urls: Vec::new(),
            noise: NoiseRules::default(),
        }
    }
}

impl FilterConfig {
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.ignore_errors.len() + self.allow_urls.len() + self.deny_urls.len()
    }
}

/// Phrases and path conventions used by the suppression predicate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseRules {
    /// Substring identifying the in-browser compiler worker script.
    pub compiler_worker: String,
    pub recursion_phrase: String,
    /// Suffix of the main editor bundle filename.
    pub editor_bundle: String,
    pub extensions_prefix: String,
    pub non_error_prefix: String,
    pub unexpected_frame_phrase: String,
}

impl Default for NoiseRules {
    fn default() -> Self {
        Self {
            compiler_worker: "typescript-worker".into(),
            recursion_phrase: "too much recursion".into(),
            editor_bundle: "editor.main.js".into(),
            extensions_prefix: "/extensions/".into(),
            non_error_prefix: "Non-Error exception captured".into(),
            unexpected_frame_phrase: "Unexpected frame by generating stack.".into(),
        }
    }
}

impl NoiseRules {
    /// `(field, value)` pairs, for validation and reporting.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("compiler_worker", self.compiler_worker.as_str()),
            ("recursion_phrase", self.recursion_phrase.as_str()),
            ("editor_bundle", self.editor_bundle.as_str()),
            ("extensions_prefix", self.extensions_prefix.as_str()),
            ("non_error_prefix", self.non_error_prefix.as_str()),
            ("unexpected_frame_phrase", self.unexpected_frame_phrase.as_str()),
        ]
    }
}
