//! Board dimensions and treasure count.

use crate::BoardError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Default number of rows.
pub const DEFAULT_ROWS: usize = 10;
/// Default number of columns.
pub const DEFAULT_COLUMNS: usize = 10;
/// Default number of treasures.
pub const DEFAULT_TREASURE_COUNT: usize = 5;

/// Shape of a board to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    rows: usize,
    columns: usize,
    treasure_count: usize,
}

impl BoardConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptyBoard`] if either dimension is zero and
    /// [`BoardError::TooManyTreasures`] if the treasures do not fit.
    #[instrument]
    pub fn new(rows: usize, columns: usize, treasure_count: usize) -> Result<Self, BoardError> {
        let config = Self {
            rows,
            columns,
            treasure_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of treasures to bury.
    pub fn treasure_count(&self) -> usize {
        self.treasure_count
    }

    /// Total number of tiles.
    pub fn total_tiles(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// Checks the configuration can produce a board.
    ///
    /// Deserialized configurations skip [`BoardConfig::new`], so board
    /// generation calls this again.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(BoardError::EmptyBoard {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.treasure_count > self.total_tiles() {
            return Err(BoardError::TooManyTreasures {
                treasure_count: self.treasure_count,
                tiles: self.total_tiles(),
            });
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            treasure_count: DEFAULT_TREASURE_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ten_by_ten_with_five() {
        let config = BoardConfig::default();
        assert_eq!(config.rows(), 10);
        assert_eq!(config.columns(), 10);
        assert_eq!(config.treasure_count(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_dimension() {
        assert_eq!(
            BoardConfig::new(0, 4, 1),
            Err(BoardError::EmptyBoard { rows: 0, columns: 4 })
        );
    }

    #[test]
    fn test_rejects_too_many_treasures() {
        assert_eq!(
            BoardConfig::new(2, 2, 5),
            Err(BoardError::TooManyTreasures {
                treasure_count: 5,
                tiles: 4
            })
        );
    }

    #[test]
    fn test_full_board_is_allowed() {
        assert!(BoardConfig::new(3, 3, 9).is_ok());
    }
}
