//! Bibliographic lookup service abstraction
//!
//! Provides a unified interface over the external literature database:
//! - `EntrezLookup` talks to the NCBI PubMed E-utilities over HTTP
//! - `MockLookup` serves canned data for tests and offline runs
//!
//! The service is read-only and safe to call repeatedly. A relation the
//! corpus lacks (no references, no cited-by, no authored papers) comes back
//! as an empty list, never as an error.

use crate::errors::Result;
use crate::models::{PaperId, Record};
use async_trait::async_trait;
use std::collections::HashMap;

mod entrez;

pub use entrez::EntrezLookup;

/// Opaque handle to a cached search session, reusable across paginated
/// fetches when the service supports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub webenv: String,
    pub query_key: String,
}

/// Result of an author search
#[derive(Debug, Clone)]
pub struct AuthorSearch {
    pub ids: Vec<PaperId>,
    pub session: Option<SessionToken>,
}

/// Citation relations for a set of papers. Either list may be empty when
/// the underlying corpus lacks that relation.
#[derive(Debug, Clone, Default)]
pub struct CrossRefLinks {
    pub references: Vec<PaperId>,
    pub cited_by: Vec<PaperId>,
}

/// Trait for bibliographic lookups
#[async_trait]
pub trait BiblioLookup: Send + Sync {
    /// Search for papers whose author list contains the given name,
    /// optionally restricted by affiliation.
    async fn search_by_author(
        &self,
        name: &str,
        affiliation: Option<&str>,
    ) -> Result<AuthorSearch>;

    /// Fetch bibliographic records for a set of ids (bulk).
    async fn fetch_records(&self, ids: &[PaperId]) -> Result<Vec<Record>>;

    /// Fetch the reference and cited-by relations for a set of ids,
    /// combined across the set.
    async fn cross_reference(&self, ids: &[PaperId]) -> Result<CrossRefLinks>;
}

/// In-memory lookup service for testing
#[derive(Debug, Default)]
pub struct MockLookup {
    authored: HashMap<String, Vec<PaperId>>,
    records: HashMap<PaperId, Record>,
    references: HashMap<PaperId, Vec<PaperId>>,
    cited_by: HashMap<PaperId, Vec<PaperId>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the papers an author search for `term` returns.
    pub fn with_authored(mut self, term: &str, ids: &[&str]) -> Self {
        self.authored
            .insert(term.to_string(), ids.iter().map(|s| (*s).into()).collect());
        self
    }

    /// Register a record, deriving first/last authors from the list.
    pub fn with_record(mut self, id: &str, title: &str, authors: &[&str]) -> Self {
        let authors: Vec<String> = authors.iter().map(|s| s.to_string()).collect();
        let record = Record {
            id: id.into(),
            title: Some(title.to_string()),
            first_author: authors.first().cloned(),
            last_author: authors.last().cloned(),
            authors,
            journal: Some("J Test Biol".to_string()),
            date: Some("2020".to_string()),
        };
        self.records.insert(id.into(), record);
        self
    }

    pub fn with_references(mut self, id: &str, refs: &[&str]) -> Self {
        self.references
            .insert(id.into(), refs.iter().map(|s| (*s).into()).collect());
        self
    }

    pub fn with_cited_by(mut self, id: &str, citers: &[&str]) -> Self {
        self.cited_by
            .insert(id.into(), citers.iter().map(|s| (*s).into()).collect());
        self
    }
}

#[async_trait]
impl BiblioLookup for MockLookup {
    async fn search_by_author(
        &self,
        name: &str,
        _affiliation: Option<&str>,
    ) -> Result<AuthorSearch> {
        Ok(AuthorSearch {
            ids: self.authored.get(name).cloned().unwrap_or_default(),
            session: None,
        })
    }

    async fn fetch_records(&self, ids: &[PaperId]) -> Result<Vec<Record>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }

    async fn cross_reference(&self, ids: &[PaperId]) -> Result<CrossRefLinks> {
        let mut links = CrossRefLinks::default();
        for id in ids {
            if let Some(refs) = self.references.get(id) {
                links.references.extend(refs.iter().cloned());
            }
            if let Some(citers) = self.cited_by.get(id) {
                links.cited_by.extend(citers.iter().cloned());
            }
        }
        Ok(links)
    }
}
