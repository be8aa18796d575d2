//! Wire messages exchanged between host and players.
//!
//! Every payload is a JSON object with an explicit discriminator:
//!
//! ```json
//! {"type": "move", "payload": {"x": "1", "y": "0"}}
//! {"type": "status", "payload": "Score: 1 - 0"}
//! ```

use serde::{Deserialize, Serialize};
use treasure_board::{Board, Position};
use tracing::{instrument, trace};

/// A move submitted by a player.
///
/// Coordinates travel as strings; the host parses them when applying the move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Column.
    pub x: String,
    /// Row.
    pub y: String,
}

impl MoveRequest {
    /// Creates a move request from raw coordinate strings.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Parses the coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidCoordinate`] if either coordinate is not a
    /// non-negative integer.
    pub fn position(&self) -> Result<Position, WireError> {
        let invalid = || WireError::InvalidCoordinate {
            x: self.x.clone(),
            y: self.y.clone(),
        };
        let x = self.x.trim().parse().map_err(|_| invalid())?;
        let y = self.y.trim().parse().map_err(|_| invalid())?;
        Ok(Position::new(x, y))
    }
}

impl From<Position> for MoveRequest {
    fn from(position: Position) -> Self {
        Self::new(position.x.to_string(), position.y.to_string())
    }
}

/// Tagged union of everything sent over the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WireMessage {
    /// Player to host: reveal a tile.
    Move(MoveRequest),
    /// Host to players: full board snapshot.
    Board(Board),
    /// Host to one player: score or outcome text.
    Status(String),
}

impl WireMessage {
    /// Serializes the message.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Encode`] if serialization fails.
    #[instrument(skip(self), fields(kind = %self))]
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let bytes = serde_json::to_vec(self).map_err(|e| WireError::Encode {
            message: e.to_string(),
        })?;
        trace!(len = bytes.len(), "Encoded message");
        Ok(bytes)
    }

    /// Parses a message, dispatching once on its `type` tag.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Decode`] for malformed bytes or unknown tags.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(|e| WireError::Decode {
            message: e.to_string(),
        })
    }
}

/// Errors at the wire boundary.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum WireError {
    /// Bytes did not parse as a [`WireMessage`].
    #[display("Failed to decode message: {message}")]
    Decode {
        /// Parser error text.
        message: String,
    },

    /// A message could not be serialized.
    #[display("Failed to encode message: {message}")]
    Encode {
        /// Serializer error text.
        message: String,
    },

    /// Move coordinates are not non-negative integers.
    #[display("Invalid coordinates ({x}, {y})")]
    InvalidCoordinate {
        /// Raw column.
        x: String,
        /// Raw row.
        y: String,
    },

    /// A well-formed message arrived where it makes no sense.
    #[display("Unexpected {kind} message")]
    Unexpected {
        /// Tag of the offending message.
        kind: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_has_explicit_tag() {
        let bytes = WireMessage::Move(MoveRequest::new("3", "7")).encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "move", "payload": {"x": "3", "y": "7"}})
        );
    }

    #[test]
    fn test_status_decodes() {
        let message = WireMessage::decode(br#"{"type":"status","payload":"Score: 1 - 0"}"#).unwrap();
        assert_eq!(message, WireMessage::Status("Score: 1 - 0".into()));
    }

    #[test]
    fn test_board_survives_the_wire() {
        let mut board = Board::with_treasures(2, 3, &[Position::new(2, 1)]).unwrap();
        board.reveal(2, 1).unwrap();

        let bytes = WireMessage::Board(board.clone()).encode().unwrap();
        assert_eq!(WireMessage::decode(&bytes).unwrap(), WireMessage::Board(board));
    }

    #[test]
    fn test_unknown_tag_is_decode_error() {
        let result = WireMessage::decode(br#"{"type":"chat","payload":"hi"}"#);
        assert!(matches!(result, Err(WireError::Decode { .. })));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            WireMessage::decode(b"\xff\x00not json"),
            Err(WireError::Decode { .. })
        ));
    }

    #[test]
    fn test_coordinates_parse() {
        assert_eq!(MoveRequest::new("4", " 2").position(), Ok(Position::new(4, 2)));
        assert_eq!(MoveRequest::from(Position::new(9, 0)), MoveRequest::new("9", "0"));
    }

    #[test]
    fn test_bad_coordinates_are_rejected() {
        for (x, y) in [("-1", "0"), ("a", "1"), ("", "2"), ("1.5", "0")] {
            assert_eq!(
                MoveRequest::new(x, y).position(),
                Err(WireError::InvalidCoordinate {
                    x: x.to_string(),
                    y: y.to_string(),
                })
            );
        }
    }
}
