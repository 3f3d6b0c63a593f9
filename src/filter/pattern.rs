//! Compiled form of [`Pattern`] lists.

use regex::Regex;

use crate::config::model::Pattern;
use crate::error::GatewayError;

#[derive(Debug, Clone)]
enum Matcher {
    Text(String),
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::Text(needle) => haystack.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(haystack),
        }
    }
}

/// A set of patterns; matches when any member matches.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    matchers: Vec<Matcher>,
}

impl PatternSet {
    pub fn compile(patterns: &[Pattern]) -> Result<Self, GatewayError> {
        let matchers = patterns
            .iter()
            .map(|p| match p {
                Pattern::Text(s) => Ok(Matcher::Text(s.clone())),
                Pattern::Regex(s) => {
                    Regex::new(s)
                        .map(Matcher::Regex)
                        .map_err(|source| GatewayError::InvalidPattern {
                            pattern: s.clone(),
                            source,
                        })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(haystack))
    }
}
