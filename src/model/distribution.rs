use serde::{Deserialize, Serialize};

/// Picks an index with probability proportional to its weight.
///
/// Consumes exactly one `f64` from `rng`. Returns `None` when no weight is
/// positive.
pub fn pick_weighted(weights: &[f64], rng: &mut fastrand::Rng) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }

    let target = rng.f64() * total;
    let mut cumulative = 0.0;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if w.is_nan() || w <= 0.0 {
            continue;
        }
        cumulative += w;
        if target < cumulative {
            return Some(i);
        }
        last = Some(i);
    }
    // float rounding can leave `target` a hair above the final sum
    last
}

/// Normalized categorical distribution over outcome characters, kept in
/// ascending character order so draws do not depend on hash ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    outcomes: Vec<char>,
    probabilities: Vec<f64>,
}

impl Distribution {
    /// Zero counts are dropped; outcomes are sorted and deduplicated.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (char, u64)>,
    {
        let mut pairs: Vec<(char, u64)> = counts.into_iter().filter(|(_, n)| *n > 0).collect();
        pairs.sort_by_key(|(c, _)| *c);
        pairs.dedup_by(|later, earlier| {
            if later.0 == earlier.0 {
                earlier.1 += later.1;
                true
            } else {
                false
            }
        });

        let total: u64 = pairs.iter().map(|(_, n)| n).sum();
        if total == 0 {
            return Self::default();
        }
        let total = total as f64;

        Self {
            outcomes: pairs.iter().map(|(c, _)| *c).collect(),
            probabilities: pairs.iter().map(|(_, n)| *n as f64 / total).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        self.outcomes
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    pub fn probability(&self, outcome: char) -> f64 {
        self.outcomes
            .binary_search(&outcome)
            .map(|i| self.probabilities[i])
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    pub fn sample(&self, rng: &mut fastrand::Rng) -> Option<char> {
        pick_weighted(&self.probabilities, rng).map(|i| self.outcomes[i])
    }
}
