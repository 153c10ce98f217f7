use proptest::prelude::*;
use std::collections::BTreeMap;
use typoforge::corpus::CorpusPair;
use typoforge::extract::{extract_statistics, DiffExtractor, EditStatistics, NoProgress};
use typoforge::model::{ModelBuildParams, Operation, ProbabilityModel};
use typoforge::corrupt;

// --- STRATEGIES ---

const ALPHABET: &[char] = &['a', 'b', 'c', 'd', 'e', ' '];

fn arb_char() -> impl Strategy<Value = char> {
    proptest::sample::select(ALPHABET)
}

prop_compose! {
    fn arb_statistics()(
        occurrences in proptest::collection::btree_map(arb_char(), 0u64..200, 1..6),
        deletions in proptest::collection::btree_map(arb_char(), 0u64..50, 0..6),
        substitutions in proptest::collection::btree_map((arb_char(), arb_char()), 1u64..50, 0..10),
        insertions in proptest::collection::btree_map((arb_char(), arb_char(), arb_char()), 1u64..50, 0..10),
        adjacency in proptest::collection::btree_map((arb_char(), arb_char()), 0u64..200, 0..10),
        transpositions in proptest::collection::btree_map((arb_char(), arb_char()), 1u64..20, 0..6),
    ) -> EditStatistics {
        EditStatistics {
            occurrences,
            deletions,
            substitutions,
            insertions,
            adjacency,
            transpositions,
            ..Default::default()
        }
    }
}

fn build(stats: EditStatistics, min_count: i64) -> ProbabilityModel {
    ModelBuildParams::builder()
        .statistics(stats)
        .min_count(min_count)
        .build()
        .build_model()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_distributions_sum_to_one(stats in arb_statistics(), min_count in 1i64..100) {
        let model = build(stats, min_count);
        for c in model.vocabulary() {
            for dist in [
                model.substitution_distribution(c),
                model.insert_before_distribution(c),
                model.insert_after_distribution(c),
            ]
            .into_iter()
            .flatten()
            {
                prop_assert!((dist.total() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn prop_rare_chars_are_absent(stats in arb_statistics(), min_count in 1i64..100) {
        let rare: Vec<char> = stats
            .occurrences
            .iter()
            .filter(|(_, n)| (**n as i64) < min_count)
            .map(|(c, _)| *c)
            .collect();
        let model = build(stats, min_count);

        for &r in &rare {
            prop_assert!(!model.contains(r));
            for op in Operation::PER_CHAR {
                prop_assert_eq!(model.op_probability(r, op), 0.0);
            }
            for c in model.vocabulary() {
                for dist in [
                    model.substitution_distribution(c),
                    model.insert_before_distribution(c),
                    model.insert_after_distribution(c),
                ]
                .into_iter()
                .flatten()
                {
                    prop_assert_eq!(dist.probability(r), 0.0);
                }
            }
        }
    }

    #[test]
    fn prop_corruption_is_deterministic(
        stats in arb_statistics(),
        text in "[abcde ABCDE]{0,40}",
        seed in any::<u64>(),
        weight in 0.01f64..=1.0,
    ) {
        let model = build(stats, 1);
        let first = corrupt(&model, &text, weight, seed).unwrap();
        let second = corrupt(&model, &text, weight, seed).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_unknown_text_passes_through(
        stats in arb_statistics(),
        text in "[0-9xyz!?]{0,40}",
        seed in any::<u64>(),
    ) {
        let model = build(stats, 1);
        let out = corrupt(&model, &text, 1.0, seed).unwrap();
        prop_assert_eq!(out.text, text);
        prop_assert!(out.tally.is_empty());
    }

    #[test]
    fn prop_extraction_is_additive(
        pairs in proptest::collection::vec(("[abc]{0,8}", "[abc]{0,8}"), 0..20)
    ) {
        let corpus: Vec<CorpusPair> = pairs.iter().map(|(c, t)| CorpusPair::new(c.as_str(), t.as_str())).collect();
        let doubled: Vec<CorpusPair> = corpus.iter().chain(corpus.iter()).cloned().collect();

        let mut once = extract_statistics(&DiffExtractor, &corpus, &NoProgress).unwrap();
        once.merge(once.clone());
        let twice = extract_statistics(&DiffExtractor, &doubled, &NoProgress).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_tally_accounts_for_every_vocabulary_char(
        text in "[abcde]{0,40}",
        seed in any::<u64>(),
    ) {
        // no transpositions, so every char is visited exactly once
        let occurrences: BTreeMap<char, u64> = "abcde".chars().map(|c| (c, 100)).collect();
        let stats = EditStatistics {
            occurrences,
            deletions: [('a', 30), ('c', 10)].into_iter().collect(),
            substitutions: [(('b', 'd'), 20)].into_iter().collect(),
            ..Default::default()
        };
        let model = build(stats, 10);
        let out = corrupt(&model, &text, 1.0, seed).unwrap();
        prop_assert_eq!(out.tally.total() as usize, text.chars().count());
    }
}
