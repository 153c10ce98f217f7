use crate::config::validate_weight;
use crate::error::TfResult;
use crate::model::distribution::pick_weighted;
use crate::model::{CharModel, Operation, ProbabilityModel};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Per-operation counts of what a generation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally(BTreeMap<Operation, u64>);

impl Tally {
    pub fn record(&mut self, op: Operation) {
        *self.0.entry(op).or_insert(0) += 1;
    }

    pub fn get(&self, op: Operation) -> u64 {
        self.0.get(&op).copied().unwrap_or(0)
    }

    /// Count of characters that were actually changed.
    pub fn applied(&self) -> u64 {
        self.0
            .iter()
            .filter(|(op, _)| op.is_applied())
            .map(|(_, n)| n)
            .sum()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn merge(&mut self, other: &Tally) {
        for (&op, &n) in &other.0 {
            *self.0.entry(op).or_insert(0) += n;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Operation, u64)> + '_ {
        self.0.iter().map(|(op, n)| (*op, *n))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Operation, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (Operation, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corruption {
    pub text: String,
    pub tally: Tally,
}

/// Lowercase form used for model lookups; characters whose lowercase
/// expands to several chars are looked up as-is.
fn canonical(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn push_cased(out: &mut String, c: char, upper: bool) {
    if upper {
        out.extend(c.to_uppercase());
    } else {
        out.push(c);
    }
}

/// State of one corruption pass. Owns its random stream, so independent runs
/// never interfere.
pub struct GenerationRun<'m> {
    model: &'m ProbabilityModel,
    weight: f64,
    rng: fastrand::Rng,
    output: String,
    tally: Tally,
    skip: bool,
}

impl<'m> GenerationRun<'m> {
    pub fn new(model: &'m ProbabilityModel, weight: f64, seed: u64) -> TfResult<Self> {
        Ok(Self::seeded(model, validate_weight(weight)?, seed))
    }

    fn seeded(model: &'m ProbabilityModel, weight: f64, seed: u64) -> Self {
        Self {
            model,
            weight,
            rng: fastrand::Rng::with_seed(seed),
            output: String::new(),
            tally: Tally::default(),
            skip: false,
        }
    }

    pub fn run(mut self, text: &str) -> Corruption {
        let chars: Vec<char> = text.chars().collect();
        self.output.reserve(text.len() + text.len() / 8);

        for (i, &c) in chars.iter().enumerate() {
            if self.skip {
                self.skip = false;
                continue;
            }
            self.step(c, chars.get(i + 1).copied());
        }

        Corruption {
            text: self.output,
            tally: self.tally,
        }
    }

    fn step(&mut self, current: char, next: Option<char>) {
        let lower = canonical(current);
        let Some(entry) = self.model.char_model(lower) else {
            self.output.push(current);
            return;
        };

        let w = self.weight;
        let mut candidates = Vec::with_capacity(5);
        candidates.push((Operation::Deletion, entry.effective(Operation::Deletion) * w));
        candidates.push((
            Operation::Substitution,
            entry.effective(Operation::Substitution) * w,
        ));
        candidates.push((
            Operation::InsertAfter,
            entry.effective(Operation::InsertAfter) * w,
        ));
        candidates.push((
            Operation::InsertBefore,
            entry.effective(Operation::InsertBefore) * w,
        ));
        if let Some(next) = next {
            if let Some(p) = self.model.transposition_probability(lower, canonical(next)) {
                candidates.push((Operation::Transposition, p * w));
            }
        }

        let total: f64 = candidates.iter().map(|(_, p)| p).sum();
        // a total above 1 simply always succeeds
        if self.rng.f64() >= total {
            self.output.push(current);
            self.tally.record(Operation::Nothing);
            return;
        }

        let weights: Vec<f64> = candidates.iter().map(|(_, p)| *p).collect();
        // `effective` zeroes operations with an empty distribution and a
        // transposition is only a candidate when `next` exists, so a chosen
        // operation always has an outcome.
        let applied = pick_weighted(&weights, &mut self.rng)
            .map(|idx| candidates[idx].0)
            .and_then(|op| self.apply(entry, op, current, next).map(|()| op));
        debug_assert!(
            applied.is_some(),
            "operation drawn for {:?} had no outcome",
            current
        );

        match applied {
            Some(op) => self.tally.record(op),
            None => {
                self.output.push(current);
                self.tally.record(Operation::Nothing);
            }
        }
    }

    /// Emits `current` transformed by `op`. `None` leaves the output untouched.
    fn apply(
        &mut self,
        entry: &CharModel,
        op: Operation,
        current: char,
        next: Option<char>,
    ) -> Option<()> {
        let upper = current.is_uppercase();
        match op {
            Operation::Deletion => {}
            Operation::Substitution => {
                let replacement = entry.substitution.sample(&mut self.rng)?;
                push_cased(&mut self.output, replacement, upper);
            }
            Operation::InsertBefore => {
                let inserted = entry.insert_before.sample(&mut self.rng)?;
                push_cased(&mut self.output, inserted, upper);
                self.output.push(current);
            }
            Operation::InsertAfter => {
                let inserted = entry.insert_after.sample(&mut self.rng)?;
                self.output.push(current);
                push_cased(&mut self.output, inserted, upper);
            }
            Operation::Transposition => {
                self.output.push(next?);
                self.output.push(current);
                self.skip = true;
            }
            Operation::Nothing => return None,
        }
        Some(())
    }
}

pub fn corrupt(
    model: &ProbabilityModel,
    text: &str,
    weight: f64,
    seed: u64,
) -> TfResult<Corruption> {
    Ok(GenerationRun::new(model, weight, seed)?.run(text))
}

/// Corrupts `texts` in parallel; text `i` uses seed `seed + i`, so the result
/// matches sequential calls.
pub fn corrupt_batch<S>(
    model: &ProbabilityModel,
    texts: &[S],
    weight: f64,
    seed: u64,
) -> TfResult<Vec<Corruption>>
where
    S: AsRef<str> + Sync,
{
    validate_weight(weight)?;
    texts
        .par_iter()
        .enumerate()
        .map(|(i, text)| corrupt(model, text.as_ref(), weight, seed.wrapping_add(i as u64)))
        .collect()
}

/// Shareable handle for repeated corruption with one model and weight.
/// Keeps a running tally across every call.
pub struct Corruptor {
    model: Arc<ProbabilityModel>,
    weight: f64,
    generated: Mutex<Tally>,
}

impl Corruptor {
    pub fn new(model: Arc<ProbabilityModel>, weight: f64) -> TfResult<Self> {
        Ok(Self {
            model,
            weight: validate_weight(weight)?,
            generated: Mutex::new(Tally::default()),
        })
    }

    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn corrupt(&self, text: &str, seed: u64) -> Corruption {
        let result = GenerationRun::seeded(&self.model, self.weight, seed).run(text);

        self.generated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .merge(&result.tally);
        result
    }

    /// Everything generated through this handle so far.
    pub fn generated(&self) -> Tally {
        self.generated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
