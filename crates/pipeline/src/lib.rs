//! BioScout Similarity Pipeline
//!
//! Given a seed set of papers, discovers the candidate biologists in their
//! citation neighborhood, encodes everyone's referenced-paper history into a
//! shared co-citation feature space, ranks the candidates by correlation
//! with the seed set, and aggregates a reading list from the top cohort.
//!
//! All external data flows through a [`BiblioLookup`] passed in explicitly;
//! the pipeline holds no global state and runs its lookups sequentially.

pub mod errors;
pub mod expand;
pub mod features;
pub mod names;
pub mod profile;
pub mod reading_list;
pub mod similarity;

pub use errors::{PipelineError, Result};
pub use features::{FeatureTable, FeatureVocabulary, RowLabel};
pub use reading_list::{CoverageRow, ReadingItem};
pub use similarity::{SimilarityEntry, SimilarityTable};

use bioscout_common::lookup::BiblioLookup;
use bioscout_common::models::{AuthorName, SeedSet};
use tracing::{info, instrument};

/// Everything the pipeline produces for one seed set.
#[derive(Debug)]
pub struct SimilarityReport {
    /// Ranked similarity table, comparison entry included.
    pub similarity: SimilarityTable,
    /// The top-fraction cohort, in rank order.
    pub cohort: Vec<AuthorName>,
    /// Citation coverage per 10%-step threshold.
    pub coverage: Vec<CoverageRow>,
    /// Most-cited papers within the cohort, resolved for display.
    pub reading_list: Vec<ReadingItem>,
}

/// The similarity pipeline, parameterized by a lookup service.
pub struct Pipeline<'a> {
    lookup: &'a dyn BiblioLookup,
}

impl<'a> Pipeline<'a> {
    pub fn new(lookup: &'a dyn BiblioLookup) -> Self {
        Self { lookup }
    }

    /// Run the full pipeline: expansion, normalization, profiling, feature
    /// encoding, similarity ranking, and reading-list aggregation.
    #[instrument(skip(self, seed), fields(seed_len = seed.len()))]
    pub async fn run(
        &self,
        seed: &SeedSet,
        fraction: f64,
        reading_list_size: usize,
    ) -> Result<SimilarityReport> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(PipelineError::InvalidFraction(fraction));
        }
        if reading_list_size == 0 {
            return Err(PipelineError::EmptyReadingList);
        }

        let expansion = expand::expand_seed_population(self.lookup, seed).await?;

        let population = names::candidate_population(expansion.raw_names);
        info!(candidates = population.len(), "Candidate population fixed");

        let profiles = profile::build_profiles(self.lookup, &population).await?;

        let table = FeatureTable::build(&profiles, &expansion.seed_references);
        info!(
            vocabulary = table.vocabulary().len(),
            rows = table.rows().len(),
            "Feature space built"
        );

        let similarity = SimilarityTable::from_table(&table);
        info!(
            ranked = similarity.biologist_count(),
            "Similarity ranking complete"
        );

        let cohort = reading_list::most_similar(&similarity, fraction)?;
        info!(cohort = cohort.len(), fraction, "Similarity cohort selected");

        let tallied = reading_list::tally(&table, &cohort);
        let coverage = reading_list::coverage_summary(&tallied, cohort.len());
        reading_list::log_coverage(&coverage);

        let reading_list =
            reading_list::resolve_reading_list(self.lookup, &tallied, reading_list_size).await?;

        Ok(SimilarityReport {
            similarity,
            cohort,
            coverage,
            reading_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscout_common::lookup::MockLookup;
    use bioscout_common::models::PaperId;

    /// Two seed papers with overlapping reference lists, a citation
    /// neighborhood of four papers, and four discoverable biologists (one
    /// of whom has no retrievable papers).
    fn scenario() -> MockLookup {
        MockLookup::new()
            // Seed neighborhood
            .with_references("s1", &["r1", "r2"])
            .with_references("s2", &["r2", "r3"])
            .with_cited_by("s1", &["c1"])
            .with_record("r1", "Ref one", &["Smith, John A", "Zhao, Mei"])
            .with_record("r2", "Ref two", &["Smith, J A"])
            .with_record("r3", "Ref three", &["Jones, Peter", "Lee, Kai"])
            .with_record("c1", "Citer one", &["Zhao, Mei", "Jones, Peter"])
            // Authored papers per candidate (search term = key, comma removed)
            .with_authored("Jones Peter", &["a1"])
            .with_authored("Lee Kai", &["a2"])
            .with_authored("Smith John A", &["a3", "a4"])
            // Zhao has no retrievable papers: degraded, not fatal
            // References of the authored papers
            .with_references("a1", &["r2", "x1"])
            .with_references("a2", &["r1", "r2"])
            .with_references("a3", &["r1", "x1"])
            .with_references("a4", &["x2"])
    }

    #[tokio::test]
    async fn test_end_to_end_report() {
        let mock = scenario();
        let seed = SeedSet::new(vec!["s1".into(), "s2".into()]).unwrap();

        let pipeline = Pipeline::new(&mock);
        let report = pipeline.run(&seed, 0.5, 2).await.unwrap();

        // Population: spaced-initial "Smith, JA" merged into the fuller
        // "Smith, John A"; Zhao kept despite having no papers.
        let ranked: Vec<String> = report
            .similarity
            .ranked_biologists()
            .map(|n| n.as_str().to_string())
            .collect();
        assert!(ranked.contains(&"Jones, Peter".to_string()));
        assert!(ranked.contains(&"Lee, Kai".to_string()));
        assert!(ranked.contains(&"Smith, John A".to_string()));
        assert!(!ranked.iter().any(|n| n == "Smith, JA"));

        // Zhao's empty profile encodes to a constant vector and is dropped.
        assert!(!ranked.iter().any(|n| n.starts_with("Zhao")));

        // The comparison entry tops the table at its theoretical maximum.
        let top = &report.similarity.entries()[0];
        assert_eq!(top.label, RowLabel::Comparison);
        assert!((top.score - 1.0).abs() < 1e-12);

        // Lee cites {r1, r2}, the closest match to the seed's {r1, r2, r3}.
        assert_eq!(ranked[0], "Lee, Kai");

        // floor(3 ranked biologists * 0.5) = 1 cohort member.
        assert_eq!(report.cohort.len(), 1);
        assert_eq!(report.cohort[0].as_str(), "Lee, Kai");

        // Lee's two cited papers lead the tally and resolve to records.
        assert_eq!(report.reading_list.len(), 2);
        let ids: Vec<&str> = report
            .reading_list
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert!(report.reading_list[0].record.is_some());

        // Coverage at 100% of a one-member cohort: exactly Lee's papers.
        let full = report.coverage.iter().find(|c| c.percent == 100).unwrap();
        assert_eq!(full.threshold, 1);
        assert_eq!(full.papers, 2);
    }

    #[tokio::test]
    async fn test_profiles_stay_within_vocabulary() {
        let mock = scenario();
        let seed = SeedSet::new(vec!["s1".into(), "s2".into()]).unwrap();

        let expansion = expand::expand_seed_population(&mock, &seed).await.unwrap();
        let population = names::candidate_population(expansion.raw_names.clone());
        assert!(!population.is_empty());

        let profiles = profile::build_profiles(&mock, &population).await.unwrap();
        let table = FeatureTable::build(&profiles, &expansion.seed_references);

        let vocabulary: std::collections::BTreeSet<&PaperId> =
            table.vocabulary().ids().iter().collect();
        for references in profiles.values() {
            assert!(references.iter().all(|id| vocabulary.contains(id)));
        }

        for row in table.rows() {
            assert_eq!(row.bits.len(), table.vocabulary().len());
        }
    }

    #[tokio::test]
    async fn test_invalid_parameters_rejected_before_any_lookup() {
        let mock = MockLookup::new();
        let seed = SeedSet::new(vec!["s1".into()]).unwrap();
        let pipeline = Pipeline::new(&mock);

        assert!(matches!(
            pipeline.run(&seed, 0.0, 5).await,
            Err(PipelineError::InvalidFraction(_))
        ));
        assert!(matches!(
            pipeline.run(&seed, 0.5, 0).await,
            Err(PipelineError::EmptyReadingList)
        ));
    }
}
