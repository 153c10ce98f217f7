use super::EditEvent;
use crate::util::entries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw counts gathered from a corpus before any threshold is applied.
///
/// Every map is additive, so statistics from disjoint shards can be merged
/// in any order and produce the same totals as a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditStatistics {
    pub rows_seen: u64,
    /// Rows whose edits did not reduce to the four known kinds.
    pub rows_skipped: u64,
    #[serde(with = "entries")]
    pub occurrences: BTreeMap<char, u64>,
    /// Ordered adjacent pairs `(c1, c2)` in clean text.
    #[serde(with = "entries")]
    pub adjacency: BTreeMap<(char, char), u64>,
    #[serde(with = "entries")]
    pub deletions: BTreeMap<char, u64>,
    /// `(original, typo)`
    #[serde(with = "entries")]
    pub substitutions: BTreeMap<(char, char), u64>,
    /// Keyed in clean order.
    #[serde(with = "entries")]
    pub transpositions: BTreeMap<(char, char), u64>,
    /// `(before, inserted, after)`
    #[serde(with = "entries")]
    pub insertions: BTreeMap<(char, char, char), u64>,
}

/// Per-character view of the raw counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterStatistics {
    pub occurrence_count: u64,
    pub deletion_count: u64,
    pub substitution_count: u64,
    /// Insertions observed immediately before this character.
    pub insertion_before_count: u64,
    /// Insertions observed immediately after this character.
    pub insertion_after_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairStatistics {
    pub transposition_count: u64,
    pub adjacency_count: u64,
}

fn bump<K: Ord>(map: &mut BTreeMap<K, u64>, key: K, by: u64) {
    *map.entry(key).or_insert(0) += by;
}

fn absorb<K: Ord>(into: &mut BTreeMap<K, u64>, from: BTreeMap<K, u64>) {
    for (k, v) in from {
        bump(into, k, v);
    }
}

impl EditStatistics {
    /// Accounts for one row: its clean text always contributes occurrence and
    /// adjacency counts; `events` of `None` marks the row as skipped.
    pub fn observe(&mut self, clean: &str, events: Option<&[EditEvent]>) {
        self.rows_seen += 1;

        let mut prev = None;
        for c in clean.chars() {
            bump(&mut self.occurrences, c, 1);
            if let Some(p) = prev {
                bump(&mut self.adjacency, (p, c), 1);
            }
            prev = Some(c);
        }

        match events {
            Some(events) => events.iter().for_each(|e| self.record(e)),
            None => self.rows_skipped += 1,
        }
    }

    pub fn record(&mut self, event: &EditEvent) {
        match *event {
            EditEvent::Deletion(c) => bump(&mut self.deletions, c, 1),
            EditEvent::Substitution { original, typo } => {
                bump(&mut self.substitutions, (original, typo), 1)
            }
            EditEvent::Transposition { first, second } => {
                bump(&mut self.transpositions, (first, second), 1)
            }
            EditEvent::Insertion {
                before,
                inserted,
                after,
            } => bump(&mut self.insertions, (before, inserted, after), 1),
        }
    }

    pub fn merge(&mut self, other: EditStatistics) {
        self.rows_seen += other.rows_seen;
        self.rows_skipped += other.rows_skipped;
        absorb(&mut self.occurrences, other.occurrences);
        absorb(&mut self.adjacency, other.adjacency);
        absorb(&mut self.deletions, other.deletions);
        absorb(&mut self.substitutions, other.substitutions);
        absorb(&mut self.transpositions, other.transpositions);
        absorb(&mut self.insertions, other.insertions);
    }

    pub fn total_events(&self) -> u64 {
        self.deletions.values().sum::<u64>()
            + self.substitutions.values().sum::<u64>()
            + self.transpositions.values().sum::<u64>()
            + self.insertions.values().sum::<u64>()
    }

    /// Folds the event maps into one record per character that appears in
    /// any of them.
    pub fn character_statistics(&self) -> BTreeMap<char, CharacterStatistics> {
        let mut out: BTreeMap<char, CharacterStatistics> = BTreeMap::new();

        for (&c, &n) in &self.occurrences {
            out.entry(c).or_default().occurrence_count = n;
        }
        for (&c, &n) in &self.deletions {
            out.entry(c).or_default().deletion_count += n;
        }
        for (&(original, _), &n) in &self.substitutions {
            out.entry(original).or_default().substitution_count += n;
        }
        for (&(before, _, after), &n) in &self.insertions {
            out.entry(after).or_default().insertion_before_count += n;
            out.entry(before).or_default().insertion_after_count += n;
        }
        out
    }

    pub fn pair_statistics(&self) -> BTreeMap<(char, char), PairStatistics> {
        let mut out: BTreeMap<(char, char), PairStatistics> = BTreeMap::new();
        for (&pair, &n) in &self.adjacency {
            out.entry(pair).or_default().adjacency_count = n;
        }
        for (&pair, &n) in &self.transpositions {
            out.entry(pair).or_default().transposition_count += n;
        }
        out
    }
}
