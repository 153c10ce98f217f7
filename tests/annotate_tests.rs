mod common;

use common::StatsBuilder;
use std::cell::RefCell;
use typoforge::annotate::{round_trip, EditAnnotator, EditSpan, MergeStrategy};
use typoforge::corrupt;

/// Token-level annotator: every differing whitespace token becomes one span.
#[derive(Default)]
struct TokenDiff {
    seen: RefCell<Vec<MergeStrategy>>,
}

impl EditAnnotator for TokenDiff {
    fn annotate(&self, original: &str, corrected: &str, merge: MergeStrategy) -> Vec<EditSpan> {
        self.seen.borrow_mut().push(merge);
        original
            .split_whitespace()
            .zip(corrected.split_whitespace())
            .enumerate()
            .filter(|(_, (o, c))| o != c)
            .map(|(i, (o, c))| EditSpan {
                orig_start: i,
                orig_end: i + 1,
                original: o.to_string(),
                corrected: c.to_string(),
                category: "R:SPELL".to_string(),
            })
            .collect()
    }
}

#[test]
fn test_round_trip_pairs_each_text_with_its_corruption() {
    let model = StatsBuilder::new()
        .occurs("abc", 100)
        .substitutes('a', 'c', 50)
        .model(10);
    let texts = ["abc bca", "cab abc", "ccc"];
    let annotator = TokenDiff::default();

    let trips = round_trip(&annotator, &model, &texts, 1.0, 9, MergeStrategy::AllSplit).unwrap();

    assert_eq!(trips.len(), texts.len());
    for (i, trip) in trips.iter().enumerate() {
        assert_eq!(trip.clean, texts[i]);
        let expected = corrupt(&model, texts[i], 1.0, 9 + i as u64).unwrap();
        assert_eq!(trip.corruption, expected);
        for span in &trip.edits {
            assert_ne!(span.original, span.corrected);
        }
    }

    // "ccc" has nothing the model can touch
    assert!(trips[2].edits.is_empty());
    assert!(annotator
        .seen
        .borrow()
        .iter()
        .all(|m| *m == MergeStrategy::AllSplit));
}

#[test]
fn test_edits_point_back_to_clean_tokens() {
    let model = StatsBuilder::new()
        .occurs("a", 100)
        .substitutes('a', 'b', 100)
        .occurs("b", 100)
        .model(10);
    let annotator = TokenDiff::default();

    let trips = round_trip(&annotator, &model, &["x a x"], 1.0, 0, MergeStrategy::Rules).unwrap();
    let trip = &trips[0];

    assert_eq!(trip.corruption.text, "x b x");
    assert_eq!(
        trip.edits,
        vec![EditSpan {
            orig_start: 1,
            orig_end: 2,
            original: "b".to_string(),
            corrected: "a".to_string(),
            category: "R:SPELL".to_string(),
        }]
    );
}

#[test]
fn test_invalid_weight_is_rejected_before_annotation() {
    let model = StatsBuilder::new().occurs("a", 10).model(1);
    let annotator = TokenDiff::default();

    let result = round_trip(&annotator, &model, &["a"], 0.0, 0, MergeStrategy::Rules);
    assert!(result.is_err());
    assert!(annotator.seen.borrow().is_empty());
}

#[test]
fn test_merge_strategy_names() {
    assert_eq!(MergeStrategy::default(), MergeStrategy::Rules);
    assert_eq!(
        MergeStrategy::parse("all-split").ok(),
        None,
        "names are snake_case"
    );
    assert_eq!(
        MergeStrategy::parse("ALL_MERGE").unwrap(),
        MergeStrategy::AllMerge
    );
    assert_eq!(MergeStrategy::AllEqual.to_string(), "all_equal");

    let msg = MergeStrategy::parse("fuzzy").unwrap_err().to_string();
    assert!(msg.contains("rules"));
}
