//! Core domain types for the treasure board.

use serde::{Deserialize, Serialize};

/// A grid coordinate. `x` is the column, `y` is the row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Position {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A single square of the board.
///
/// The coordinates are fixed when the tile is created. `hidden` only ever
/// goes from `true` to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    hidden: bool,
    treasure: bool,
    x: usize,
    y: usize,
}

impl Tile {
    /// Creates a hidden, empty tile at the given coordinates.
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            hidden: true,
            treasure: false,
            x,
            y,
        }
    }

    /// Returns true while the tile has not been revealed.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Returns true if treasure is buried here.
    pub fn treasure(&self) -> bool {
        self.treasure
    }

    /// Column of this tile.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Row of this tile.
    pub fn y(&self) -> usize {
        self.y
    }

    /// Position of this tile.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Returns true if this tile sits at `(x, y)`.
    pub fn is_at(&self, x: usize, y: usize) -> bool {
        self.x == x && self.y == y
    }

    /// Single character used by [`crate::Board::display`].
    pub fn symbol(&self) -> char {
        match (self.hidden, self.treasure) {
            (true, _) => '#',
            (false, true) => '$',
            (false, false) => '.',
        }
    }

    pub(crate) fn bury_treasure(&mut self) {
        self.treasure = true;
    }

    pub(crate) fn uncover(&mut self) {
        self.hidden = false;
    }
}
