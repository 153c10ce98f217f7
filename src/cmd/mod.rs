pub mod corrupt;
pub mod extract;
pub mod inspect;

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;
use typoforge::extract::ExtractionProgress;

/// Logs extraction progress each time another tenth of the corpus is done.
#[derive(Default)]
pub struct ConsoleProgress {
    last_decile: AtomicUsize,
}

impl ExtractionProgress for ConsoleProgress {
    fn on_progress(&self, processed: usize, total: usize) -> bool {
        let decile = processed * 10 / total.max(1);
        if self.last_decile.swap(decile, Ordering::Relaxed) != decile {
            info!("   ... {}/{} records ({}0%)", processed, total, decile);
        }
        true
    }
}
