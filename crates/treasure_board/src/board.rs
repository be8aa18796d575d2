//! The board grid, treasure placement and reveals.

use crate::invariants::{BoardInvariants, InvariantSet};
use crate::{BoardConfig, BoardError, Position, Tile};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Fixed-size grid of tiles, stored row by row.
///
/// `tiles[y][x]` is the tile at column `x`, row `y`, and always reports
/// exactly those coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    columns: usize,
    treasure_count: usize,
    tiles: Vec<Vec<Tile>>,
}

impl Board {
    /// Generates a board with treasures placed using the thread-local RNG.
    #[instrument]
    pub fn random(config: BoardConfig) -> Result<Self, BoardError> {
        Self::generate(config, &mut rand::rng())
    }

    /// Generates a board with treasures placed by rejection sampling.
    ///
    /// Each draw picks a uniformly random coordinate; a draw that lands on a
    /// tile that already holds treasure is discarded and drawn again. Every
    /// placement of `treasure_count` distinct tiles is equally likely.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` cannot produce a board.
    #[instrument(skip(rng))]
    pub fn generate<R: Rng>(config: BoardConfig, rng: &mut R) -> Result<Self, BoardError> {
        config.validate()?;

        let mut board = Self::blank(config.rows(), config.columns());
        let mut rejected = 0_usize;

        while board.treasure_count < config.treasure_count() {
            let x = rng.random_range(0..config.columns());
            let y = rng.random_range(0..config.rows());
            let tile = &mut board.tiles[y][x];

            if tile.treasure() {
                rejected += 1;
                trace!(x, y, "Treasure collision, resampling");
                continue;
            }

            tile.bury_treasure();
            board.treasure_count += 1;
        }

        debug!(
            rows = board.rows,
            columns = board.columns,
            treasures = board.treasure_count,
            rejected,
            "Board generated"
        );
        debug_assert!(BoardInvariants::check_all(&board).is_ok());

        Ok(board)
    }

    /// Builds a board with treasure at exactly the given positions.
    ///
    /// Repeated positions count once.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyBoard`] for a zero dimension and
    /// [`BoardError::TileNotFound`] for a position outside the grid.
    #[instrument(skip(treasures), fields(treasures = treasures.len()))]
    pub fn with_treasures(
        rows: usize,
        columns: usize,
        treasures: &[Position],
    ) -> Result<Self, BoardError> {
        if rows == 0 || columns == 0 {
            return Err(BoardError::EmptyBoard { rows, columns });
        }

        let mut board = Self::blank(rows, columns);
        for &Position { x, y } in treasures {
            if x >= columns || y >= rows {
                return Err(BoardError::TileNotFound { x, y });
            }
            let tile = &mut board.tiles[y][x];
            if !tile.treasure() {
                tile.bury_treasure();
                board.treasure_count += 1;
            }
        }

        debug_assert!(BoardInvariants::check_all(&board).is_ok());
        Ok(board)
    }

    fn blank(rows: usize, columns: usize) -> Self {
        let tiles = (0..rows)
            .map(|y| (0..columns).map(|x| Tile::new(x, y)).collect())
            .collect();
        Self {
            rows,
            columns,
            treasure_count: 0,
            tiles,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of treasures buried on this board.
    pub fn treasure_count(&self) -> usize {
        self.treasure_count
    }

    /// The grid, row by row.
    pub fn grid(&self) -> &[Vec<Tile>] {
        &self.tiles
    }

    /// Iterates every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    /// Finds the tile at `(x, y)`.
    ///
    /// Scans the whole grid and matches on both coordinates, so a tile is
    /// found wherever it sits.
    pub fn find_tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles().find(|tile| tile.is_at(x, y))
    }

    fn find_tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.tiles
            .iter_mut()
            .flatten()
            .find(|tile| tile.is_at(x, y))
    }

    /// Reveals the tile at `(x, y)` and reports whether it held treasure.
    ///
    /// # Errors
    ///
    /// - [`BoardError::TileNotFound`] if no tile sits at `(x, y)`.
    /// - [`BoardError::AlreadyRevealed`] if the tile was revealed before.
    ///
    /// The board is unchanged on error.
    #[instrument(skip(self))]
    pub fn reveal(&mut self, x: usize, y: usize) -> Result<bool, BoardError> {
        let tile = self
            .find_tile_mut(x, y)
            .ok_or(BoardError::TileNotFound { x, y })?;

        if !tile.hidden() {
            return Err(BoardError::AlreadyRevealed { x, y });
        }

        tile.uncover();
        let treasure = tile.treasure();
        debug!(x, y, treasure, "Tile revealed");
        Ok(treasure)
    }

    /// Number of revealed tiles.
    pub fn revealed_count(&self) -> usize {
        self.tiles().filter(|tile| !tile.hidden()).count()
    }

    /// Number of revealed tiles that held treasure.
    pub fn revealed_treasures(&self) -> usize {
        self.tiles()
            .filter(|tile| !tile.hidden() && tile.treasure())
            .count()
    }

    /// Positions of every treasure, revealed or not.
    pub fn treasure_positions(&self) -> Vec<Position> {
        self.tiles()
            .filter(|tile| tile.treasure())
            .map(Tile::position)
            .collect()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// `#` is hidden, `$` is revealed treasure, `.` is revealed and empty.
    pub fn display(&self) -> String {
        self.tiles
            .iter()
            .map(|row| row.iter().map(Tile::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generate_places_exact_treasure_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::generate(BoardConfig::default(), &mut rng).unwrap();

        assert_eq!(board.treasure_count(), 5);
        assert_eq!(board.tiles().filter(|t| t.treasure()).count(), 5);
        assert!(board.tiles().all(Tile::hidden));
    }

    #[test]
    fn test_generate_is_deterministic_for_seed() {
        let config = BoardConfig::new(6, 4, 8).unwrap();
        let a = Board::generate(config, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Board::generate(config, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_fills_full_board() {
        let config = BoardConfig::new(3, 3, 9).unwrap();
        let board = Board::generate(config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(board.tiles().all(Tile::treasure));
    }

    #[test]
    fn test_tiles_know_their_position() {
        let board = Board::with_treasures(3, 5, &[]).unwrap();
        for (y, row) in board.grid().iter().enumerate() {
            assert_eq!(row.len(), 5);
            for (x, tile) in row.iter().enumerate() {
                assert!(tile.is_at(x, y));
            }
        }
    }

    #[test]
    fn test_find_tile_covers_last_row_and_column() {
        let board = Board::with_treasures(4, 3, &[]).unwrap();
        assert!(board.find_tile(0, 0).is_some());
        assert!(board.find_tile(2, 3).is_some());
        assert!(board.find_tile(0, 3).is_some());
        assert!(board.find_tile(3, 0).is_none());
        assert!(board.find_tile(0, 4).is_none());
    }

    #[test]
    fn test_reveal_reports_treasure() {
        let mut board = Board::with_treasures(2, 2, &[Position::new(1, 0)]).unwrap();
        assert_eq!(board.reveal(1, 0), Ok(true));
        assert_eq!(board.reveal(0, 1), Ok(false));
        assert_eq!(board.revealed_count(), 2);
        assert_eq!(board.revealed_treasures(), 1);
    }

    #[test]
    fn test_reveal_twice_is_rejected() {
        let mut board = Board::with_treasures(2, 2, &[Position::new(0, 0)]).unwrap();
        assert_eq!(board.reveal(0, 0), Ok(true));
        let before = board.clone();

        assert_eq!(
            board.reveal(0, 0),
            Err(BoardError::AlreadyRevealed { x: 0, y: 0 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_reveal_out_of_bounds() {
        let mut board = Board::with_treasures(2, 2, &[]).unwrap();
        let before = board.clone();
        assert_eq!(
            board.reveal(2, 0),
            Err(BoardError::TileNotFound { x: 2, y: 0 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_with_treasures_collapses_duplicates() {
        let spots = [Position::new(1, 1), Position::new(1, 1)];
        let board = Board::with_treasures(2, 2, &spots).unwrap();
        assert_eq!(board.treasure_count(), 1);
        assert_eq!(board.treasure_positions(), vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_with_treasures_rejects_out_of_bounds() {
        assert_eq!(
            Board::with_treasures(2, 2, &[Position::new(0, 2)]),
            Err(BoardError::TileNotFound { x: 0, y: 2 })
        );
    }

    #[test]
    fn test_display_marks_revealed_tiles() {
        let mut board = Board::with_treasures(2, 3, &[Position::new(2, 1)]).unwrap();
        board.reveal(0, 0).unwrap();
        board.reveal(2, 1).unwrap();
        assert_eq!(board.display(), ".##\n##$");
    }
}
