use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Deletion,
    Substitution,
    InsertBefore,
    InsertAfter,
    Transposition,
    /// The character was eligible but left untouched.
    Nothing,
}

impl Operation {
    /// The four operations whose probability is stored per character.
    pub const PER_CHAR: [Operation; 4] = [
        Operation::Deletion,
        Operation::Substitution,
        Operation::InsertBefore,
        Operation::InsertAfter,
    ];

    pub fn is_applied(&self) -> bool {
        !matches!(self, Operation::Nothing)
    }
}

/// Raw per-character operation probabilities, insertions already halved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CharProbabilities {
    pub deletion: f64,
    pub substitution: f64,
    pub insert_before: f64,
    pub insert_after: f64,
}

impl CharProbabilities {
    pub fn get(&self, op: Operation) -> f64 {
        match op {
            Operation::Deletion => self.deletion,
            Operation::Substitution => self.substitution,
            Operation::InsertBefore => self.insert_before,
            Operation::InsertAfter => self.insert_after,
            Operation::Transposition | Operation::Nothing => 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.deletion + self.substitution + self.insert_before + self.insert_after
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub threshold: u64,
    pub vocabulary: usize,
    /// Characters seen in clean text but below the threshold.
    pub dropped_chars: usize,
    pub substitution_events_kept: u64,
    pub insertion_events_kept: u64,
    pub transposition_pairs: usize,
    /// Pairs with observed swaps whose adjacency count fell short.
    pub dropped_pairs: usize,
}
