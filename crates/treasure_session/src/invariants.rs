//! Game-level invariants, composed from the board crate's invariant traits.

use crate::game::{GamePhase, GameState};
use treasure_board::Invariant;

/// Invariant: the score total never exceeds the treasure count.
pub struct ScoreBoundInvariant;

impl Invariant<GameState> for ScoreBoundInvariant {
    fn holds(game: &GameState) -> bool {
        game.scoreboard().total() <= game.board().treasure_count()
    }

    fn description() -> &'static str {
        "Score total never exceeds the treasure count"
    }
}

/// Invariant: every point was earned by revealing a treasure.
///
/// A revealed treasure is scored exactly once, so the score total equals
/// the number of revealed treasure tiles.
pub struct ScoresMatchRevealsInvariant;

impl Invariant<GameState> for ScoresMatchRevealsInvariant {
    fn holds(game: &GameState) -> bool {
        game.scoreboard().total() == game.board().revealed_treasures()
    }

    fn description() -> &'static str {
        "Score total equals revealed treasures"
    }
}

/// Invariant: the game is finished exactly when every treasure is found.
pub struct FinishedWhenCompleteInvariant;

impl Invariant<GameState> for FinishedWhenCompleteInvariant {
    fn holds(game: &GameState) -> bool {
        match game.phase() {
            GamePhase::WaitingForPlayers => game.scoreboard().total() == 0,
            GamePhase::InProgress => !game.scoreboard().is_complete(),
            GamePhase::Finished => game.scoreboard().is_complete(),
        }
    }

    fn description() -> &'static str {
        "Game is finished exactly when all treasures are found"
    }
}

/// All game invariants as a composable set.
pub type GameInvariants = (
    ScoreBoundInvariant,
    ScoresMatchRevealsInvariant,
    FinishedWhenCompleteInvariant,
);
