//! Board error types.

use derive_more::{Display, Error};

/// Errors raised by board construction and reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// No tile exists at the requested coordinates.
    #[display("Tile ({x}, {y}) not found")]
    TileNotFound {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
    },

    /// The tile was revealed by an earlier move.
    #[display("Tile ({x}, {y}) is already revealed")]
    AlreadyRevealed {
        /// Column of the tile.
        x: usize,
        /// Row of the tile.
        y: usize,
    },

    /// A board needs at least one row and one column.
    #[display("Board must be at least 1x1, got {rows}x{columns}")]
    EmptyBoard {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        columns: usize,
    },

    /// More treasures than tiles.
    #[display("Cannot bury {treasure_count} treasures in {tiles} tiles")]
    TooManyTreasures {
        /// Requested treasure count.
        treasure_count: usize,
        /// Tiles available.
        tiles: usize,
    },
}
