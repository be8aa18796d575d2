//! Treasure count invariant: the header count matches the buried treasures.

use super::Invariant;
use crate::Board;

/// Invariant: exactly `treasure_count` tiles hold treasure.
///
/// Treasure positions are distinct by construction since each tile holds at
/// most one treasure.
pub struct TreasureCountInvariant;

impl Invariant<Board> for TreasureCountInvariant {
    fn holds(board: &Board) -> bool {
        board.tiles().filter(|tile| tile.treasure()).count() == board.treasure_count()
    }

    fn description() -> &'static str {
        "Buried treasures equal the board's treasure count"
    }
}
