//! Citation graph expansion around the seed papers
//!
//! Discovers the candidate population: every paper the seeds reference plus
//! every paper citing them, reduced to the first- and last-listed authors of
//! each neighbor. Read-only against the lookup service.

use crate::errors::Result;
use bioscout_common::lookup::BiblioLookup;
use bioscout_common::models::{PaperId, SeedSet};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Everything learned from one pass over the seed neighborhood.
///
/// The seed reference set is captured here so the comparison vector does not
/// need a second cross-reference round trip later.
#[derive(Debug, Clone)]
pub struct SeedExpansion {
    /// Raw first/last author-name strings, duplicates included.
    pub raw_names: Vec<String>,
    /// Papers the seed set itself references.
    pub seed_references: BTreeSet<PaperId>,
}

/// Expand the seed set into its citation neighborhood and collect the raw
/// first/last author names of every neighboring paper.
#[instrument(skip(lookup), fields(seed_len = seed.len()))]
pub async fn expand_seed_population(
    lookup: &dyn BiblioLookup,
    seed: &SeedSet,
) -> Result<SeedExpansion> {
    let links = lookup.cross_reference(seed.ids()).await?;

    if links.references.is_empty() {
        info!("No references found for the seed papers");
    }
    if links.cited_by.is_empty() {
        info!("No cited-in found for the seed papers");
    }

    let seed_references: BTreeSet<PaperId> = links.references.iter().cloned().collect();

    let neighborhood: BTreeSet<PaperId> = links
        .references
        .into_iter()
        .chain(links.cited_by)
        .collect();
    let neighborhood: Vec<PaperId> = neighborhood.into_iter().collect();

    info!(papers = neighborhood.len(), "Expanded seed citation neighborhood");

    let records = lookup.fetch_records(&neighborhood).await?;
    if records.len() < neighborhood.len() {
        // The corpus omits records for some ids; those papers contribute no names.
        info!(
            missing = neighborhood.len() - records.len(),
            "Some neighborhood papers had no retrievable record"
        );
    }

    let mut raw_names = Vec::with_capacity(records.len() * 2);
    for record in &records {
        debug!(paper = %record.id, "Collecting first/last authors");
        if let Some(first) = &record.first_author {
            raw_names.push(first.clone());
        }
        if let Some(last) = &record.last_author {
            raw_names.push(last.clone());
        }
    }

    Ok(SeedExpansion {
        raw_names,
        seed_references,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscout_common::lookup::MockLookup;

    #[tokio::test]
    async fn test_expansion_unions_both_relations() {
        let mock = MockLookup::new()
            .with_references("s1", &["r1", "r2"])
            .with_cited_by("s1", &["c1"])
            .with_record("r1", "Ref one", &["Smith, John", "Zhao, Mei"])
            .with_record("r2", "Ref two", &["Lee, Kai"])
            .with_record("c1", "Citer", &["Jones, Peter", "Smith, John"]);

        let seed = SeedSet::new(vec!["s1".into()]).unwrap();
        let expansion = expand_seed_population(&mock, &seed).await.unwrap();

        // First and last author per neighbor; a single-author paper
        // contributes its one name twice.
        assert_eq!(expansion.raw_names.len(), 6);
        assert_eq!(
            expansion.raw_names.iter().filter(|n| *n == "Lee, Kai").count(),
            2
        );
        assert_eq!(
            expansion.seed_references,
            ["r1", "r2"].iter().map(|s| PaperId::from(*s)).collect()
        );
    }

    #[tokio::test]
    async fn test_missing_relations_yield_empty_population() {
        // A seed with no cross-reference data is a gap, not an error.
        let mock = MockLookup::new();
        let seed = SeedSet::new(vec!["lonely".into()]).unwrap();

        let expansion = expand_seed_population(&mock, &seed).await.unwrap();
        assert!(expansion.raw_names.is_empty());
        assert!(expansion.seed_references.is_empty());
    }

    #[tokio::test]
    async fn test_unfetchable_neighbors_contribute_no_names() {
        let mock = MockLookup::new()
            .with_references("s1", &["r1", "ghost"])
            .with_record("r1", "Ref one", &["Smith, John"]);

        let seed = SeedSet::new(vec!["s1".into()]).unwrap();
        let expansion = expand_seed_population(&mock, &seed).await.unwrap();
        assert_eq!(expansion.raw_names, vec!["Smith, John", "Smith, John"]);
    }
}
