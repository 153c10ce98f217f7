//! Seam for an external grammatical-edit annotator.
//!
//! No annotator ships with this crate. Implementors align an (original,
//! corrected) sentence pair and return typed edit spans; [`round_trip`] feeds
//! them corrupted text so the edits the engine injected can be checked
//! against what the annotator recovers.

use crate::engine::{corrupt_batch, Corruption};
use crate::error::{TfResult, TypoError};
use crate::model::ProbabilityModel;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// How adjacent token-level edits are merged into spans.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    EnumIter,
    EnumString,
    Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Linguistically informed merging.
    #[default]
    Rules,
    /// Every token edit stays its own span.
    AllSplit,
    /// Adjacent mismatches collapse into one span.
    AllMerge,
    /// Adjacent edits of the same type collapse.
    AllEqual,
}

impl MergeStrategy {
    pub fn parse(name: &str) -> TfResult<Self> {
        Self::from_str(name.trim()).map_err(|_| {
            let known: Vec<String> = Self::iter().map(|v| v.to_string()).collect();
            TypoError::config(format!(
                "Unknown merge strategy '{}' (expected one of: {})",
                name,
                known.join(", ")
            ))
        })
    }
}

/// One edit in token offsets of the original sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSpan {
    pub orig_start: usize,
    pub orig_end: usize,
    pub original: String,
    pub corrected: String,
    pub category: String,
}

pub trait EditAnnotator {
    fn annotate(&self, original: &str, corrected: &str, merge: MergeStrategy) -> Vec<EditSpan>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    pub clean: String,
    pub corruption: Corruption,
    /// Edits that take the corrupted text back to `clean`.
    pub edits: Vec<EditSpan>,
}

pub fn round_trip<A, S>(
    annotator: &A,
    model: &ProbabilityModel,
    clean_texts: &[S],
    weight: f64,
    seed: u64,
    merge: MergeStrategy,
) -> TfResult<Vec<RoundTrip>>
where
    A: EditAnnotator + ?Sized,
    S: AsRef<str> + Sync,
{
    let corrupted = corrupt_batch(model, clean_texts, weight, seed)?;

    Ok(clean_texts
        .iter()
        .zip(corrupted)
        .map(|(clean, corruption)| {
            let clean = clean.as_ref();
            let edits = annotator.annotate(&corruption.text, clean, merge);
            RoundTrip {
                clean: clean.to_string(),
                corruption,
                edits,
            }
        })
        .collect())
}
