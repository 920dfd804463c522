use crate::models::{Clue, ClueKind};

/// Labels of every clue usable for full-text lookup, in input order.
/// Phrase clues are skipped.
pub fn clues_to_terms(clues: &[Clue]) -> Vec<String> {
    clues
        .iter()
        .filter(|clue| clue.kind != ClueKind::Phrase)
        .map(|clue| clue.label.clone())
        .collect()
}
