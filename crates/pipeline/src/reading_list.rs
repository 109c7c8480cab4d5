//! Reading-list aggregation over the similarity cohort
//!
//! Takes the top fraction of ranked candidates, tallies how often each
//! vocabulary paper is cited within that cohort, summarizes coverage at
//! 10%-step thresholds, and resolves the most-cited papers to displayable
//! records.

use crate::errors::{PipelineError, Result};
use crate::features::{FeatureTable, RowLabel};
use crate::similarity::SimilarityTable;
use bioscout_common::lookup::BiblioLookup;
use bioscout_common::models::{AuthorName, PaperId, Record};
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// One coverage threshold line: `papers` vocabulary entries were cited by at
/// least `threshold` cohort members (`percent`% of the cohort).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRow {
    pub percent: u32,
    pub threshold: usize,
    pub papers: usize,
}

/// A recommended paper with its citation count within the cohort.
#[derive(Debug, Clone)]
pub struct ReadingItem {
    pub id: PaperId,
    pub citations: usize,
    /// Resolved record, absent when the corpus has none for this id.
    pub record: Option<Record>,
}

/// The top `floor(N * fraction)` ranked biologists, comparison excluded.
pub fn most_similar(table: &SimilarityTable, fraction: f64) -> Result<Vec<AuthorName>> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(PipelineError::InvalidFraction(fraction));
    }
    let n = table.biologist_count();
    let take = (n as f64 * fraction).floor() as usize;
    Ok(table.ranked_biologists().take(take).cloned().collect())
}

/// Per-vocabulary-paper citation counts across the cohort, sorted by count
/// descending; ties keep vocabulary order.
pub fn tally(table: &FeatureTable, cohort: &[AuthorName]) -> Vec<(PaperId, usize)> {
    let members: BTreeSet<&AuthorName> = cohort.iter().collect();
    let mut counts = vec![0usize; table.vocabulary().len()];

    for row in table.rows() {
        let RowLabel::Biologist(name) = &row.label else {
            continue;
        };
        if !members.contains(name) {
            continue;
        }
        for (slot, &bit) in counts.iter_mut().zip(&row.bits) {
            *slot += bit as usize;
        }
    }

    let mut tallied: Vec<(PaperId, usize)> = table
        .vocabulary()
        .ids()
        .iter()
        .cloned()
        .zip(counts)
        .collect();
    tallied.sort_by(|a, b| b.1.cmp(&a.1));
    tallied
}

/// Coverage at 10%..100% of the cohort, in 10-point steps.
pub fn coverage_summary(tallied: &[(PaperId, usize)], cohort_len: usize) -> Vec<CoverageRow> {
    (1..=10)
        .map(|step| {
            let percent = step * 10;
            let threshold = (cohort_len as f64 * percent as f64 / 100.0).round() as usize;
            let papers = tallied.iter().filter(|(_, count)| *count >= threshold).count();
            CoverageRow {
                percent,
                threshold,
                papers,
            }
        })
        .collect()
}

/// Log the coverage summary in report form.
pub fn log_coverage(coverage: &[CoverageRow]) {
    for row in coverage {
        let noun = if row.papers == 1 { "paper was" } else { "papers were" };
        info!(
            "{} {} cited at least once by {}% ({}) of the most similar biologists",
            row.papers, noun, row.percent, row.threshold
        );
    }
}

/// Resolve the top-K tallied papers to displayable records.
#[instrument(skip(lookup, tallied))]
pub async fn resolve_reading_list(
    lookup: &dyn BiblioLookup,
    tallied: &[(PaperId, usize)],
    size: usize,
) -> Result<Vec<ReadingItem>> {
    if size == 0 {
        return Err(PipelineError::EmptyReadingList);
    }

    let top: Vec<(PaperId, usize)> = tallied.iter().take(size).cloned().collect();
    let ids: Vec<PaperId> = top.iter().map(|(id, _)| id.clone()).collect();

    let records = lookup.fetch_records(&ids).await?;

    let items = top
        .into_iter()
        .map(|(id, citations)| {
            let record = records.iter().find(|r| r.id == id).cloned();
            ReadingItem {
                id,
                citations,
                record,
            }
        })
        .collect();

    Ok(items)
}
