use super::{BuildReport, CharModel, CharProbabilities, Distribution, ProbabilityModel};
use crate::config::{validate_threshold, DEFAULT_MIN_COUNT};
use crate::error::TfResult;
use crate::extract::EditStatistics;
use std::collections::BTreeMap;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ModelBuildParams {
    pub statistics: EditStatistics,
    #[builder(default = DEFAULT_MIN_COUNT)]
    pub min_count: i64,
}

type Histograms = BTreeMap<char, BTreeMap<char, u64>>;

fn bump(hist: &mut Histograms, key: char, outcome: char, by: u64) {
    *hist.entry(key).or_default().entry(outcome).or_insert(0) += by;
}

fn ratio(count: u64, occurrences: u64) -> f64 {
    if occurrences == 0 {
        0.0
    } else {
        count as f64 / occurrences as f64
    }
}

impl ModelBuildParams {
    pub fn build_model(self) -> TfResult<ProbabilityModel> {
        self.build_with_report().map(|(model, _)| model)
    }

    pub fn build_with_report(self) -> TfResult<(ProbabilityModel, BuildReport)> {
        let threshold = validate_threshold(self.min_count)?;
        let stats = self.statistics;

        // 1. Significance filter
        let vocabulary: BTreeMap<char, u64> = stats
            .occurrences
            .iter()
            .filter(|(_, n)| **n >= threshold)
            .map(|(&c, &n)| (c, n))
            .collect();
        let retained = |c: char| vocabulary.contains_key(&c);
        debug!(
            "vocabulary: {} of {} chars meet threshold {}",
            vocabulary.len(),
            stats.occurrences.len(),
            threshold
        );

        // 2. Outcome histograms over the retained vocabulary only
        let mut report = BuildReport {
            threshold,
            vocabulary: vocabulary.len(),
            dropped_chars: stats.occurrences.len() - vocabulary.len(),
            ..Default::default()
        };

        let mut substitutions = Histograms::new();
        for (&(original, typo), &n) in &stats.substitutions {
            if retained(original) && retained(typo) {
                bump(&mut substitutions, original, typo, n);
                report.substitution_events_kept += n;
            }
        }

        // keyed by the neighbour: `before_hist[after]`, `after_hist[before]`
        let mut before_hist = Histograms::new();
        let mut after_hist = Histograms::new();
        for (&(before, inserted, after), &n) in &stats.insertions {
            if retained(before) && retained(inserted) && retained(after) {
                bump(&mut before_hist, after, inserted, n);
                bump(&mut after_hist, before, inserted, n);
                report.insertion_events_kept += n;
            }
        }

        // 3. Per-character probabilities
        let mut chars = BTreeMap::new();
        for (&c, &occurrences) in &vocabulary {
            let deletions = stats.deletions.get(&c).copied().unwrap_or(0);
            let subs = substitutions.remove(&c).unwrap_or_default();
            let before = before_hist.remove(&c).unwrap_or_default();
            let after = after_hist.remove(&c).unwrap_or_default();

            let probabilities = CharProbabilities {
                deletion: ratio(deletions, occurrences),
                substitution: ratio(subs.values().sum(), occurrences),
                // one insertion is seen from both neighbours
                insert_before: ratio(before.values().sum(), occurrences) / 2.0,
                insert_after: ratio(after.values().sum(), occurrences) / 2.0,
            };

            chars.insert(
                c,
                CharModel {
                    probabilities,
                    substitution: Distribution::from_counts(subs),
                    insert_before: Distribution::from_counts(before),
                    insert_after: Distribution::from_counts(after),
                },
            );
        }

        // 4. Transpositions normalized by adjacency
        let mut transpositions = BTreeMap::new();
        for (&pair, &swaps) in &stats.transpositions {
            let adjacency = stats.adjacency.get(&pair).copied().unwrap_or(0);
            if swaps > 0 && adjacency >= threshold {
                transpositions.insert(pair, ratio(swaps, adjacency));
            } else {
                report.dropped_pairs += 1;
            }
        }
        report.transposition_pairs = transpositions.len();

        info!(
            "🧮 Model built: {} chars ({} dropped), {} transposition pairs",
            report.vocabulary, report.dropped_chars, report.transposition_pairs
        );

        Ok((
            ProbabilityModel::from_parts(threshold, chars, transpositions),
            report,
        ))
    }
}
