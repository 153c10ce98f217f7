use super::diff::EditOp::{self, Added, Equal, Removed};
use super::EditEvent;

/// Reduces an edit script to the four known edit kinds.
///
/// Scans left to right; at each position transposition wins over
/// substitution, which wins over insertion, which wins over deletion.
/// Returns `None` as soon as a non-`Equal` token cannot be covered, so
/// a row either classifies completely or not at all.
pub fn classify(script: &[EditOp]) -> Option<Vec<EditEvent>> {
    let mut events = Vec::new();
    let mut i = 0;

    while i < script.len() {
        match &script[i..] {
            // typo shows `y x` where the clean text had `x y`
            [Added(x), Equal(y), Removed(z), ..] if x == z => {
                events.push(EditEvent::Transposition {
                    first: *y,
                    second: *x,
                });
                i += 3;
            }
            [Removed(x), Equal(y), Added(z), ..] if x == z => {
                events.push(EditEvent::Transposition {
                    first: *x,
                    second: *y,
                });
                i += 3;
            }
            [Removed(x), Added(y), ..] => {
                events.push(EditEvent::Substitution {
                    original: *x,
                    typo: *y,
                });
                i += 2;
            }
            [Equal(before), Added(x), Equal(after), rest @ ..]
                if !matches!(rest.first(), Some(Removed(r)) if r == x) =>
            {
                events.push(EditEvent::Insertion {
                    before: *before,
                    inserted: *x,
                    after: *after,
                });
                i += 2;
            }
            [Equal(_), Removed(x), Equal(_), rest @ ..]
                if !matches!(rest.first(), Some(Added(r)) if r == x) =>
            {
                events.push(EditEvent::Deletion(*x));
                i += 2;
            }
            [Equal(_), ..] => i += 1,
            _ => return None,
        }
    }

    Some(events)
}
