//! Tile identity invariant: every tile reports its own grid position.

use super::Invariant;
use crate::Board;

/// Invariant: the grid is `rows × columns` and `grid[y][x]` is at `(x, y)`.
pub struct TileIdentityInvariant;

impl Invariant<Board> for TileIdentityInvariant {
    fn holds(board: &Board) -> bool {
        let grid = board.grid();
        if grid.len() != board.rows() {
            return false;
        }

        grid.iter().enumerate().all(|(y, row)| {
            row.len() == board.columns()
                && row.iter().enumerate().all(|(x, tile)| tile.is_at(x, y))
        })
    }

    fn description() -> &'static str {
        "Every tile matches its grid position"
    }
}
