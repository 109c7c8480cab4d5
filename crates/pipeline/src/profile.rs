//! Per-biologist citation profiles
//!
//! For each candidate, the papers referenced across their authored works.
//! Only the `references` relation is consulted here; cited-by is part of the
//! seed expansion, not of a biologist's own citing behavior.

use crate::errors::Result;
use bioscout_common::lookup::BiblioLookup;
use bioscout_common::models::{AuthorName, PaperId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// AuthorName -> set of referenced papers, one entry per candidate.
pub type CitationProfiles = BTreeMap<AuthorName, BTreeSet<PaperId>>;

/// Build a citation profile for every candidate in the population.
///
/// Every per-biologist failure degrades to an empty reference set for that
/// biologist; a single bad lookup never aborts the pipeline.
#[instrument(skip_all, fields(candidates = population.len()))]
pub async fn build_profiles(
    lookup: &dyn BiblioLookup,
    population: &[AuthorName],
) -> Result<CitationProfiles> {
    let mut profiles = CitationProfiles::new();
    let mut zero_papers: Vec<&AuthorName> = Vec::new();
    let mut total_authored = 0usize;

    for biologist in population {
        debug!(biologist = %biologist, "Looking up authored papers");

        let authored = match lookup
            .search_by_author(&biologist.search_term(), None)
            .await
        {
            Ok(search) => search.ids,
            Err(e) => {
                warn!(biologist = %biologist, error = %e, "Author search failed, profile left empty");
                profiles.insert(biologist.clone(), BTreeSet::new());
                zero_papers.push(biologist);
                continue;
            }
        };

        total_authored += authored.len();
        if authored.is_empty() {
            zero_papers.push(biologist);
            profiles.insert(biologist.clone(), BTreeSet::new());
            continue;
        }

        debug!(biologist = %biologist, papers = authored.len(), "Looking up cited papers");
        let references = match lookup.cross_reference(&authored).await {
            Ok(links) => {
                if links.references.is_empty() {
                    info!(biologist = %biologist, "No references found");
                }
                links.references.into_iter().collect()
            }
            Err(e) => {
                warn!(biologist = %biologist, error = %e, "Cross-reference failed, profile left empty");
                BTreeSet::new()
            }
        };

        profiles.insert(biologist.clone(), references);
    }

    info!(
        total_authored,
        "The candidate population authored {} papers in the corpus", total_authored
    );
    if !zero_papers.is_empty() {
        info!(
            count = zero_papers.len(),
            authors = ?zero_papers,
            "Zero papers were retrieved for some candidates"
        );
    }

    Ok(profiles)
}
