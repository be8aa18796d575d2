//! Host-side game state machine: seating, turns, reveals and termination.

use crate::invariants::GameInvariants;
use crate::peer::{PeerId, PlayerSlot, Seats};
use crate::score::{OutcomeEvent, Scoreboard};
use serde::{Deserialize, Serialize};
use treasure_board::{Board, BoardError, InvariantSet, Position};
#[cfg(debug_assertions)]
use treasure_board::{BoardTransition, Invariant, MonotonicRevealInvariant};
use tracing::{debug, info, instrument, warn};

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Fewer than two players admitted.
    WaitingForPlayers,
    /// Accepting moves.
    InProgress,
    /// Every treasure found. Terminal.
    Finished,
}

/// Why a move was not applied.
///
/// None of these change game state. The host logs them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Moves are only accepted while the game is in progress.
    #[display("Game is {phase}, not accepting moves")]
    NotInProgress {
        /// Phase at the time of the move.
        phase: GamePhase,
    },

    /// The mover does not own the current turn.
    #[display("{peer} moved out of turn, waiting for {expected}")]
    OutOfTurn {
        /// Peer that sent the move.
        peer: PeerId,
        /// Peer that owns the turn.
        expected: PeerId,
    },

    /// The coordinates do not resolve to a tile.
    #[display("Tile ({x}, {y}) not found")]
    TileNotFound {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
    },

    /// The tile was revealed earlier; usually a stale or duplicate message.
    #[display("Tile ({x}, {y}) is already revealed")]
    AlreadyRevealed {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
    },

    /// A postcondition failed after applying the move.
    #[display("Invariant violation: {message}")]
    InvariantViolation {
        /// Violated invariants.
        message: String,
    },
}

impl From<BoardError> for MoveError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::TileNotFound { x, y } => MoveError::TileNotFound { x, y },
            BoardError::AlreadyRevealed { x, y } => MoveError::AlreadyRevealed { x, y },
            other => MoveError::InvariantViolation {
                message: other.to_string(),
            },
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Who moved.
    pub mover: PlayerSlot,
    /// Revealed tile.
    pub position: Position,
    /// Whether the tile held treasure.
    pub treasure: bool,
    /// Score update, present only when treasure was found.
    pub outcome: Option<OutcomeEvent>,
    /// Turn owner after the move.
    pub next: PlayerSlot,
}

/// Authoritative game state, owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    scoreboard: Scoreboard,
    current_player: PlayerSlot,
    phase: GamePhase,
    seats: Option<Seats>,
}

impl GameState {
    /// Creates a game waiting for players on the given board.
    #[instrument(skip(board), fields(rows = board.rows(), columns = board.columns()))]
    pub fn new(board: Board) -> Self {
        let scoreboard = Scoreboard::new(board.treasure_count());
        Self {
            board,
            scoreboard,
            current_player: PlayerSlot::First,
            phase: GamePhase::WaitingForPlayers,
            seats: None,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The scoreboard.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Scores in slot order.
    pub fn scores(&self) -> [usize; 2] {
        self.scoreboard.scores()
    }

    /// Slot that owns the current turn.
    pub fn current_player(&self) -> PlayerSlot {
        self.current_player
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns true once the game is over.
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// The admitted players, if any.
    pub fn seats(&self) -> Option<&Seats> {
        self.seats.as_ref()
    }

    /// Peer that owns the current turn.
    pub fn turn_owner(&self) -> Option<&PeerId> {
        self.seats.as_ref().map(|seats| seats.peer(self.current_player))
    }

    /// Seats two players and starts the game.
    ///
    /// Only valid while waiting for players. Returns false, leaving the state
    /// untouched, if the game already started or both peers are the same.
    #[instrument(skip(self))]
    pub fn admit(&mut self, first: PeerId, second: PeerId) -> bool {
        if self.phase != GamePhase::WaitingForPlayers {
            warn!(phase = %self.phase, "Players already admitted");
            return false;
        }
        let Some(seats) = Seats::new(first, second) else {
            warn!("Cannot seat the same peer twice");
            return false;
        };

        info!(
            first = %seats.peer(PlayerSlot::First),
            second = %seats.peer(PlayerSlot::Second),
            "Players admitted, game in progress"
        );
        self.seats = Some(seats);
        self.phase = if self.scoreboard.is_complete() {
            info!("No treasure to find, game over");
            GamePhase::Finished
        } else {
            GamePhase::InProgress
        };
        true
    }

    /// Applies a move from `from` at `(x, y)`.
    ///
    /// On success the tile is revealed, treasure is scored, the game may
    /// finish, and the turn passes to the other player. On error nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// - [`MoveError::NotInProgress`] before admission or after the end.
    /// - [`MoveError::OutOfTurn`] if `from` does not own the turn.
    /// - [`MoveError::TileNotFound`] / [`MoveError::AlreadyRevealed`] from
    ///   the board.
    #[instrument(skip(self), fields(phase = %self.phase, turn = %self.current_player))]
    pub fn submit_move(&mut self, from: &PeerId, x: usize, y: usize) -> Result<MoveReport, MoveError> {
        if self.phase != GamePhase::InProgress {
            return Err(MoveError::NotInProgress { phase: self.phase });
        }
        let Some(expected) = self.turn_owner() else {
            return Err(MoveError::NotInProgress { phase: self.phase });
        };
        if expected != from {
            return Err(MoveError::OutOfTurn {
                peer: from.clone(),
                expected: expected.clone(),
            });
        }

        let mover = self.current_player;
        #[cfg(debug_assertions)]
        let before = self.board.clone();
        let treasure = self.board.reveal(x, y)?;

        let outcome = treasure.then(|| self.scoreboard.apply_score(mover));
        if outcome.is_some_and(|outcome| outcome.is_terminal()) {
            info!(scores = ?self.scores(), "Game finished");
            self.phase = GamePhase::Finished;
        }

        self.current_player = mover.opponent();
        debug!(%mover, x, y, treasure, next = %self.current_player, "Move applied");

        #[cfg(debug_assertions)]
        {
            self.check_invariants()?;
            let transition = BoardTransition {
                before: &before,
                after: &self.board,
            };
            if !MonotonicRevealInvariant::holds(&transition) {
                return Err(MoveError::InvariantViolation {
                    message: MonotonicRevealInvariant::description().to_string(),
                });
            }
        }

        Ok(MoveReport {
            mover,
            position: Position::new(x, y),
            treasure,
            outcome,
            next: self.current_player,
        })
    }

    /// Checks every game invariant.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvariantViolation`] listing what failed.
    pub fn check_invariants(&self) -> Result<(), MoveError> {
        GameInvariants::check_all(self).map_err(|violations| {
            let message = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation { message }
        })
    }
}
