pub mod builder;
pub mod distribution;
pub mod types;

pub use self::builder::ModelBuildParams;
pub use self::distribution::Distribution;
pub use self::types::{BuildReport, CharProbabilities, Operation};

use crate::util::entries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the engine needs to corrupt one character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharModel {
    pub probabilities: CharProbabilities,
    pub substitution: Distribution,
    /// Characters inserted immediately before this one.
    pub insert_before: Distribution,
    /// Characters inserted immediately after this one.
    pub insert_after: Distribution,
}

impl CharModel {
    pub fn distribution(&self, op: Operation) -> Option<&Distribution> {
        match op {
            Operation::Substitution => Some(&self.substitution),
            Operation::InsertBefore => Some(&self.insert_before),
            Operation::InsertAfter => Some(&self.insert_after),
            _ => None,
        }
    }

    /// Probability the engine actually uses: operations that need an outcome
    /// draw are impossible when their distribution is empty.
    pub fn effective(&self, op: Operation) -> f64 {
        match self.distribution(op) {
            Some(d) if d.is_empty() => 0.0,
            _ => self.probabilities.get(op),
        }
    }
}

/// Read-only typo model built from thresholded corpus statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityModel {
    threshold: u64,
    #[serde(with = "entries")]
    chars: BTreeMap<char, CharModel>,
    #[serde(with = "entries")]
    transpositions: BTreeMap<(char, char), f64>,
}

impl ProbabilityModel {
    pub(crate) fn from_parts(
        threshold: u64,
        chars: BTreeMap<char, CharModel>,
        transpositions: BTreeMap<(char, char), f64>,
    ) -> Self {
        Self {
            threshold,
            chars,
            transpositions,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains_key(&c)
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.keys().copied()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.chars.len()
    }

    pub fn char_model(&self, c: char) -> Option<&CharModel> {
        self.chars.get(&c)
    }

    pub fn probabilities(&self, c: char) -> CharProbabilities {
        self.chars
            .get(&c)
            .map(|m| m.probabilities)
            .unwrap_or_default()
    }

    /// Effective per-character probability; 0 outside the vocabulary.
    pub fn op_probability(&self, c: char, op: Operation) -> f64 {
        self.chars.get(&c).map(|m| m.effective(op)).unwrap_or(0.0)
    }

    /// `None` for pairs that did not meet the threshold.
    pub fn transposition_probability(&self, first: char, second: char) -> Option<f64> {
        self.transpositions.get(&(first, second)).copied()
    }

    pub fn transpositions(&self) -> impl Iterator<Item = ((char, char), f64)> + '_ {
        self.transpositions.iter().map(|(k, v)| (*k, *v))
    }

    fn non_empty(&self, c: char, op: Operation) -> Option<&Distribution> {
        self.chars
            .get(&c)
            .and_then(|m| m.distribution(op))
            .filter(|d| !d.is_empty())
    }

    pub fn substitution_distribution(&self, c: char) -> Option<&Distribution> {
        self.non_empty(c, Operation::Substitution)
    }

    pub fn insert_before_distribution(&self, c: char) -> Option<&Distribution> {
        self.non_empty(c, Operation::InsertBefore)
    }

    pub fn insert_after_distribution(&self, c: char) -> Option<&Distribution> {
        self.non_empty(c, Operation::InsertAfter)
    }

    /// Sum of the four effective per-character probabilities.
    pub fn total_probability(&self, c: char) -> f64 {
        Operation::PER_CHAR
            .iter()
            .map(|&op| self.op_probability(c, op))
            .sum()
    }
}
