//! Co-citation feature space
//!
//! The vocabulary is the fixed, ordered union of every referenced paper;
//! each biologist (and the seed set) is encoded as a binary presence vector
//! over it. Array index is the alignment contract between rows.

use crate::profile::CitationProfiles;
use bioscout_common::models::{AuthorName, PaperId};
use std::collections::BTreeSet;
use std::fmt;

/// Fixed, ordered, duplicate-free sequence of referenced-paper ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVocabulary {
    ids: Vec<PaperId>,
}

impl FeatureVocabulary {
    /// Union every profile's reference set with the seed set's own
    /// references, materializing set-iteration order into a fixed sequence.
    pub fn build(profiles: &CitationProfiles, seed_references: &BTreeSet<PaperId>) -> Self {
        let union: BTreeSet<PaperId> = profiles
            .values()
            .flatten()
            .chain(seed_references.iter())
            .cloned()
            .collect();
        Self {
            ids: union.into_iter().collect(),
        }
    }

    pub fn ids(&self) -> &[PaperId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Binary presence vector for one reference set.
    fn encode(&self, references: &BTreeSet<PaperId>) -> Vec<u8> {
        self.ids
            .iter()
            .map(|id| u8::from(references.contains(id)))
            .collect()
    }
}

/// Identity of a feature-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLabel {
    Biologist(AuthorName),
    /// The seed set's own encoding, the similarity baseline.
    Comparison,
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLabel::Biologist(name) => f.write_str(name.as_str()),
            RowLabel::Comparison => f.write_str("comparison"),
        }
    }
}

/// One labeled binary row, aligned to the table's vocabulary.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub label: RowLabel,
    pub bits: Vec<u8>,
}

/// Strict tabular encoding: rows are biologists in population order, columns
/// are vocabulary papers, and the comparison row is appended last.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    vocabulary: FeatureVocabulary,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn build(profiles: &CitationProfiles, seed_references: &BTreeSet<PaperId>) -> Self {
        let vocabulary = FeatureVocabulary::build(profiles, seed_references);

        let mut rows: Vec<FeatureRow> = profiles
            .iter()
            .map(|(name, references)| FeatureRow {
                label: RowLabel::Biologist(name.clone()),
                bits: vocabulary.encode(references),
            })
            .collect();

        rows.push(FeatureRow {
            label: RowLabel::Comparison,
            bits: vocabulary.encode(seed_references),
        });

        Self { vocabulary, rows }
    }

    pub fn vocabulary(&self) -> &FeatureVocabulary {
        &self.vocabulary
    }

    /// All rows, comparison last.
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// The comparison row (always present, always last).
    pub fn comparison_row(&self) -> &FeatureRow {
        self.rows
            .last()
            .expect("feature table always carries a comparison row")
    }

    /// Number of biologist rows (comparison excluded).
    pub fn biologist_count(&self) -> usize {
        self.rows.len() - 1
    }

    /// Bit row for a biologist by name.
    pub fn row_for(&self, name: &AuthorName) -> Option<&FeatureRow> {
        self.rows
            .iter()
            .find(|row| matches!(&row.label, RowLabel::Biologist(n) if n == name))
    }
}
