//! Hidden-treasure board model.
//!
//! Pure game data with no I/O: a fixed grid of [`Tile`]s, a handful of which
//! hide treasure. The host owns the only mutable [`Board`]; peers receive
//! serialized snapshots.
//!
//! # Example
//!
//! ```
//! use treasure_board::{Board, Position};
//!
//! let mut board = Board::with_treasures(2, 2, &[Position::new(0, 0)])?;
//! assert!(!board.reveal(1, 1)?);
//! assert!(board.reveal(0, 0)?);
//! # Ok::<(), treasure_board::BoardError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod config;
mod error;
mod types;

pub mod invariants;

pub use board::Board;
pub use config::{BoardConfig, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TREASURE_COUNT};
pub use error::BoardError;
pub use invariants::{
    BoardInvariants, BoardTransition, Invariant, InvariantSet, InvariantViolation,
    MonotonicRevealInvariant,
};
pub use types::{Position, Tile};
