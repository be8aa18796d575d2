//! Monotonic reveal invariant: tiles are only ever uncovered.

use super::Invariant;
use crate::Board;

/// A board before and after one state change.
#[derive(Debug, Clone, Copy)]
pub struct BoardTransition<'a> {
    /// Board before the change.
    pub before: &'a Board,
    /// Board after the change.
    pub after: &'a Board,
}

/// Invariant: a change only flips `hidden` from true to false.
///
/// Shape, coordinates and treasure placement stay fixed, and a revealed
/// tile is never hidden again.
pub struct MonotonicRevealInvariant;

impl<'a> Invariant<BoardTransition<'a>> for MonotonicRevealInvariant {
    fn holds(transition: &BoardTransition<'a>) -> bool {
        let (before, after) = (transition.before, transition.after);
        if before.rows() != after.rows() || before.columns() != after.columns() {
            return false;
        }

        before.tiles().zip(after.tiles()).all(|(old, new)| {
            old.position() == new.position()
                && old.treasure() == new.treasure()
                && (old.hidden() || !new.hidden())
        })
    }

    fn description() -> &'static str {
        "Tiles are only ever revealed, never hidden or moved"
    }
}
