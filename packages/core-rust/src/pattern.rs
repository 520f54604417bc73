//! Tagged path patterns for the public-route allow-list.
//!
//! The session middleware skips resolution for allow-listed paths. Patterns
//! come from configuration as strings; a trailing `*` means prefix match,
//! anything else is an exact match.

use serde::{Deserialize, Serialize};

/// A single allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathPattern {
    /// Matches the request path exactly.
    Exact(String),
    /// Matches any request path starting with the prefix.
    PrefixWildcard(String),
}

impl PathPattern {
    /// Parses a pattern string. `"/public/*"` becomes a prefix wildcard on
    /// `"/public/"`; everything else is an exact pattern.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) => Self::PrefixWildcard(prefix.to_string()),
            None => Self::Exact(pattern.to_string()),
        }
    }

    /// Whether the given request path matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::PrefixWildcard(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// Whether any pattern in the list matches the path.
#[must_use]
pub fn any_match(patterns: &[PathPattern], path: &str) -> bool {
    patterns.iter().any(|p| p.matches(path))
}
