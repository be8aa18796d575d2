//! The joining player's side of a session.

use crate::wire::{MoveRequest, WireError, WireMessage};
use derive_getters::Getters;
use treasure_board::{Board, Position};
use tracing::{debug, instrument, warn};

/// What an inbound message changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientUpdate {
    /// A new board snapshot replaced the old one.
    Board,
    /// New status text.
    Status(String),
}

/// A player's read-only copy of the host state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ClientView {
    /// Last board received.
    board: Option<Board>,
    /// Last status text received.
    status: Option<String>,
}

impl ClientView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a message from the host.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Decode`] for malformed bytes and
    /// [`WireError::Unexpected`] for a move, which only players send.
    #[instrument(skip_all, fields(len = bytes.len()))]
    pub fn apply(&mut self, bytes: &[u8]) -> Result<ClientUpdate, WireError> {
        match WireMessage::decode(bytes)? {
            WireMessage::Board(board) => {
                debug!(revealed = board.revealed_count(), "Board updated");
                self.board = Some(board);
                Ok(ClientUpdate::Board)
            }
            WireMessage::Status(text) => {
                debug!(%text, "Status updated");
                self.status = Some(text.clone());
                Ok(ClientUpdate::Status(text))
            }
            message @ WireMessage::Move(_) => {
                warn!("Host sent a move");
                Err(WireError::Unexpected {
                    kind: message.to_string(),
                })
            }
        }
    }

    /// Encodes a move request for `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Encode`] if serialization fails.
    pub fn move_request(x: usize, y: usize) -> Result<Vec<u8>, WireError> {
        WireMessage::Move(MoveRequest::from(Position::new(x, y))).encode()
    }

    /// Positions still hidden on the last board, row by row.
    pub fn hidden_tiles(&self) -> Vec<Position> {
        self.board
            .iter()
            .flat_map(|board| board.tiles())
            .filter(|tile| tile.hidden())
            .map(|tile| tile.position())
            .collect()
    }

    /// Returns true once the last board shows every treasure found.
    pub fn is_over(&self) -> bool {
        self.board
            .as_ref()
            .is_some_and(|board| board.revealed_treasures() >= board.treasure_count())
    }
}
