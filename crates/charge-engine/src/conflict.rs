//! Detect overlapping occurrences.
//!
//! Unlike a half-open interval test, two occurrences that merely touch (one ends
//! exactly when the other starts) DO count as overlapping here.

use crate::interval::Occurrence;

/// Whether two occurrences overlap, touching endpoints included.
///
/// Symmetric: the arguments are reordered so that `early.start <= late.start`.
pub fn intersects(a: &Occurrence, b: &Occurrence) -> bool {
    let (early, late) = if b.start < a.start { (b, a) } else { (a, b) };

    if late.start == early.start || late.start == early.end {
        return true;
    }

    late.start > early.start && late.start < early.end
}

/// Find the first existing occurrence hit by any of the candidates.
///
/// Candidates are checked in order, each against every existing occurrence.
pub fn find_conflict<'a>(
    candidates: &[Occurrence],
    existing: &'a [Occurrence],
) -> Option<&'a Occurrence> {
    candidates
        .iter()
        .find_map(|candidate| existing.iter().find(|e| intersects(candidate, e)))
}
