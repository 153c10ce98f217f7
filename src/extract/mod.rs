pub mod annotated;
pub mod diff;
pub mod patterns;
pub mod stats;

pub use self::stats::{CharacterStatistics, EditStatistics, PairStatistics};

use crate::corpus::{AnnotatedTypo, CorpusPair};
use crate::error::{TfResult, TypoError};
use crate::layouts::KeyboardLayout;
use rayon::prelude::*;
use tracing::{debug, info, trace};

/// Rows handed to the thread pool between progress reports.
pub const PROGRESS_CHUNK: usize = 10_000;

/// A single classified edit, always expressed in clean-text terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditEvent {
    Deletion(char),
    Substitution { original: char, typo: char },
    /// Clean text had `first second`; the typo swapped them.
    Transposition { first: char, second: char },
    Insertion { before: char, inserted: char, after: char },
}

/// Turns one corpus record into its clean text and classified edits.
pub trait EventExtractor: Sync {
    type Record: Sync;

    fn clean_text<'r>(&self, record: &'r Self::Record) -> &'r str;

    /// `None` when the record's edits do not reduce to the known kinds.
    fn events(&self, record: &Self::Record) -> Option<Vec<EditEvent>>;
}

/// Aligns clean and typo text and classifies the resulting edit script.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffExtractor;

impl EventExtractor for DiffExtractor {
    type Record = CorpusPair;

    fn clean_text<'r>(&self, record: &'r CorpusPair) -> &'r str {
        &record.original_text
    }

    fn events(&self, record: &CorpusPair) -> Option<Vec<EditEvent>> {
        let script = diff::edit_script(&record.original_text, &record.typo_text)?;
        let events = patterns::classify(&script);
        if events.is_none() {
            trace!("unclassifiable edit script: {}", diff::render(&script));
        }
        events
    }
}

/// Decodes rows that already carry an operation tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotatedExtractor {
    pub layout: KeyboardLayout,
}

impl EventExtractor for AnnotatedExtractor {
    type Record = AnnotatedTypo;

    fn clean_text<'r>(&self, record: &'r AnnotatedTypo) -> &'r str {
        &record.original_context
    }

    fn events(&self, record: &AnnotatedTypo) -> Option<Vec<EditEvent>> {
        annotated::decode(&record.operation, &record.symbol, self.layout).map(|e| vec![e])
    }
}

pub trait ExtractionProgress: Send + Sync {
    /// Return `false` to abort the run.
    fn on_progress(&self, processed: usize, total: usize) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ExtractionProgress for NoProgress {
    fn on_progress(&self, _processed: usize, _total: usize) -> bool {
        true
    }
}

/// Mines raw counts from `records`, fanning each chunk out over rayon and
/// folding per-thread partial statistics back together.
pub fn extract_statistics<E, P>(
    extractor: &E,
    records: &[E::Record],
    progress: &P,
) -> TfResult<EditStatistics>
where
    E: EventExtractor,
    P: ExtractionProgress + ?Sized,
{
    let total = records.len();
    let mut stats = EditStatistics::default();
    let mut processed = 0;

    for chunk in records.chunks(PROGRESS_CHUNK) {
        let partial = chunk
            .par_iter()
            .fold(EditStatistics::default, |mut acc, record| {
                let events = extractor.events(record);
                acc.observe(extractor.clean_text(record), events.as_deref());
                acc
            })
            .reduce(EditStatistics::default, |mut a, b| {
                a.merge(b);
                a
            });
        stats.merge(partial);

        processed += chunk.len();
        debug!("extracted {}/{} records", processed, total);
        if !progress.on_progress(processed, total) {
            return Err(TypoError::Cancelled { processed });
        }
    }

    info!(
        "   -> {} rows, {} unclassifiable, {} edit events, {} distinct chars",
        stats.rows_seen,
        stats.rows_skipped,
        stats.total_events(),
        stats.occurrences.len()
    );
    Ok(stats)
}
