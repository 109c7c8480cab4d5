//! Normalized author identity keys
//!
//! An `AuthorName` is the canonical `"surname, givennames"` string produced
//! by the name normalizer. It is the sole identity key for a biologist: two
//! distinct people who normalize to the same string are merged silently, a
//! documented limitation of the name-keyed corpus.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the first comma. Merge decisions compare this
    /// verbatim, without trimming.
    pub fn surname(&self) -> &str {
        self.0.split(',').next().unwrap_or(&self.0)
    }

    /// The given-name part after the first comma, leading whitespace
    /// stripped. Empty when the name carries no comma.
    pub fn given(&self) -> &str {
        self.0
            .split_once(',')
            .map(|(_, g)| g.trim_start())
            .unwrap_or("")
    }

    /// First character of the given-name part, the key used by the
    /// adjacent-merge rule.
    pub fn given_initial(&self) -> Option<char> {
        self.given().chars().next()
    }

    /// Search-term form with the comma removed, the shape the author search
    /// endpoint expects.
    pub fn search_term(&self) -> String {
        self.0.replace(',', "")
    }
}

impl fmt::Display for AuthorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AuthorName {
    fn from(s: String) -> Self {
        Self(s)
    }
}
