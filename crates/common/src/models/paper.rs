//! Paper identifiers, bibliographic records, and the user-selected seed set

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque paper identifier assigned by the bibliographic service (a PMID in
/// production). No internal structure is assumed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaperId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PaperId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A bibliographic record as returned by the lookup service.
///
/// Fields the service cannot supply are `None` and render as `?` in the
/// citation line, mirroring how the upstream corpus reports missing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: PaperId,
    pub title: Option<String>,
    /// Author name strings in listed order, `"surname, givennames"` form.
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub date: Option<String>,
    pub first_author: Option<String>,
    pub last_author: Option<String>,
}

impl Record {
    /// Numbered citation line used by the selection prompt and the final
    /// reading-list output.
    pub fn citation_line(&self, index: usize) -> String {
        format!(
            "{}. {} [{}]. {}. {}. ({})",
            index,
            self.title.as_deref().unwrap_or("?"),
            self.authors.join(", "),
            self.journal.as_deref().unwrap_or("?"),
            self.date.as_deref().unwrap_or("?"),
            self.id,
        )
    }
}

/// Error returned when a seed selection is outside the allowed 1..=3 range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("seed set must contain between {MIN_SEED_PAPERS} and {MAX_SEED_PAPERS} papers, got {0}")]
pub struct SeedSetError(pub usize);

pub const MIN_SEED_PAPERS: usize = 1;
pub const MAX_SEED_PAPERS: usize = 3;

/// The user-selected starting papers. Immutable once constructed; every
/// downstream stage derives from this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSet(Vec<PaperId>);

impl SeedSet {
    pub fn new(ids: Vec<PaperId>) -> Result<Self, SeedSetError> {
        if !(MIN_SEED_PAPERS..=MAX_SEED_PAPERS).contains(&ids.len()) {
            return Err(SeedSetError(ids.len()));
        }
        Ok(Self(ids))
    }

    pub fn ids(&self) -> &[PaperId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_set_bounds() {
        assert!(SeedSet::new(vec![]).is_err());
        assert!(SeedSet::new(vec!["1".into()]).is_ok());
        assert!(SeedSet::new(vec!["1".into(), "2".into(), "3".into()]).is_ok());
        assert_eq!(
            SeedSet::new(vec!["1".into(), "2".into(), "3".into(), "4".into()]),
            Err(SeedSetError(4))
        );
    }

    #[test]
    fn test_citation_line_fills_gaps() {
        let record = Record {
            id: PaperId::new("12345"),
            title: Some("Gene regulation in E. coli".into()),
            authors: vec!["Smith, John".into(), "Zhao, Mei".into()],
            journal: None,
            date: Some("2019 Mar".into()),
            first_author: Some("Smith, John".into()),
            last_author: Some("Zhao, Mei".into()),
        };
        assert_eq!(
            record.citation_line(1),
            "1. Gene regulation in E. coli [Smith, John, Zhao, Mei]. ?. 2019 Mar. (12345)"
        );
    }
}
