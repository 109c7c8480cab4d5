//! Correlation-based similarity scoring
//!
//! Each row of the feature table is scored against the comparison row with
//! Pearson linear correlation, treating the paired binary vectors as numeric
//! samples. A constant vector has no defined correlation; such rows are
//! dropped before ranking, deterministically.

use crate::features::{FeatureTable, RowLabel};
use bioscout_common::models::AuthorName;
use tracing::{debug, instrument};

/// One ranked entry of the similarity table.
#[derive(Debug, Clone)]
pub struct SimilarityEntry {
    pub label: RowLabel,
    pub score: f64,
}

/// Rows ranked by similarity to the comparison row, descending. Ties keep
/// the original candidate order; undefined-score rows are absent.
#[derive(Debug, Clone)]
pub struct SimilarityTable {
    entries: Vec<SimilarityEntry>,
}

impl SimilarityTable {
    #[instrument(skip_all, fields(rows = table.rows().len()))]
    pub fn from_table(table: &FeatureTable) -> Self {
        let comparison = table.comparison_row();

        let mut entries: Vec<SimilarityEntry> = table
            .rows()
            .iter()
            .filter_map(|row| match pearson(&row.bits, &comparison.bits) {
                Some(score) => Some(SimilarityEntry {
                    label: row.label.clone(),
                    score,
                }),
                None => {
                    debug!(row = %row.label, "Constant vector, row dropped from ranking");
                    None
                }
            })
            .collect();

        // Stable sort: ties keep candidate order.
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self { entries }
    }

    pub fn entries(&self) -> &[SimilarityEntry] {
        &self.entries
    }

    /// Ranked biologist names, comparison entry skipped.
    pub fn ranked_biologists(&self) -> impl Iterator<Item = &AuthorName> {
        self.entries.iter().filter_map(|e| match &e.label {
            RowLabel::Biologist(name) => Some(name),
            RowLabel::Comparison => None,
        })
    }

    /// Number of biologist entries (comparison excluded).
    pub fn biologist_count(&self) -> usize {
        self.ranked_biologists().count()
    }
}

/// Pearson correlation over two equal-length binary vectors.
///
/// Returns `None` when either vector has zero variance (all 0s or all 1s),
/// where the coefficient is undefined.
pub fn pearson(x: &[u8], y: &[u8]) -> Option<f64> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_y = y.iter().map(|&v| v as f64).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a as f64 - mean_x;
        let dy = b as f64 - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(cov / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureTable;
    use crate::profile::CitationProfiles;
    use bioscout_common::models::PaperId;
    use std::collections::BTreeSet;

    fn table(entries: &[(&str, &[&str])], seed: &[&str]) -> FeatureTable {
        let profiles: CitationProfiles = entries
            .iter()
            .map(|(name, refs)| {
                (
                    AuthorName::new(*name),
                    refs.iter().map(|r| PaperId::from(*r)).collect(),
                )
            })
            .collect();
        let seed: BTreeSet<PaperId> = seed.iter().map(|r| PaperId::from(*r)).collect();
        FeatureTable::build(&profiles, &seed)
    }

    #[test]
    fn test_identical_vectors_score_one() {
        assert!((pearson(&[1, 0, 1, 0], &[1, 0, 1, 0]).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        assert!((pearson(&[1, 0, 1], &[0, 1, 0]).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_vector_is_undefined() {
        assert_eq!(pearson(&[0, 0, 0], &[1, 0, 1]), None);
        assert_eq!(pearson(&[1, 0, 1], &[1, 1, 1]), None);
    }

    #[test]
    fn test_mismatched_lengths_are_undefined() {
        assert_eq!(pearson(&[1, 0], &[1, 0, 1]), None);
    }

    #[test]
    fn test_comparison_scores_one_against_itself() {
        let t = table(&[("a", &["r1", "r2"]), ("b", &["r1"])], &["r1", "r3"]);
        let sim = SimilarityTable::from_table(&t);

        let top = &sim.entries()[0];
        assert_eq!(top.label, RowLabel::Comparison);
        assert!((top.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_table_sorted_descending_and_drops_constant_rows() {
        // Vocabulary: r1, r2, r3. Seed cites r1 and r2.
        //   close  -> [1, 1, 0] matches the seed exactly
        //   far    -> [0, 0, 1] anti-correlated
        //   silent -> [0, 0, 0] zero variance, dropped
        let t = table(
            &[
                ("close", &["r1", "r2"]),
                ("far", &["r3"]),
                ("silent", &[]),
            ],
            &["r1", "r2"],
        );
        let sim = SimilarityTable::from_table(&t);

        let labels: Vec<String> = sim.entries().iter().map(|e| e.label.to_string()).collect();
        assert!(!labels.contains(&"silent".to_string()));

        let scores: Vec<f64> = sim.entries().iter().map(|e| e.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(scores, sorted);

        // "close" ties the comparison row at 1.0 and precedes it: ties are
        // broken by original row order, and the comparison row sits last.
        assert_eq!(labels[0], "close");
        assert_eq!(labels[1], "comparison");
    }

    #[test]
    fn test_deterministic_handling_of_degenerate_input() {
        let t = table(&[("silent", &[])], &["r1"]);
        let first = SimilarityTable::from_table(&t);
        let second = SimilarityTable::from_table(&t);
        assert_eq!(first.entries().len(), second.entries().len());
        // Seed cites everything in a one-column vocabulary: the comparison
        // vector is constant too, so nothing survives.
        assert!(first.entries().is_empty());
    }
}
