//! Outbound message routing.

use crate::peer::{PeerId, PlayerSlot, Seats};
use crate::transport::Transport;
use crate::wire::WireMessage;
use treasure_board::Board;
use tracing::{debug, error, instrument};

/// Serializes host messages and sends them to players.
///
/// Sends are fire-and-forget: failures are logged and never retried or
/// reported back to the game.
#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    /// Wraps a transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends the full board to both admitted players.
    #[instrument(skip_all, fields(revealed = board.revealed_count()))]
    pub async fn broadcast_board(&self, board: &Board, seats: &Seats) {
        self.deliver(WireMessage::Board(board.clone()), &seats.peers())
            .await;
    }

    /// Sends status text to the player in `slot` only.
    #[instrument(skip(self, seats))]
    pub async fn send_to_player(&self, seats: &Seats, slot: PlayerSlot, text: String) {
        let peer = seats.peer(slot).clone();
        self.deliver(WireMessage::Status(text), &[peer]).await;
    }

    async fn deliver(&self, message: WireMessage, to: &[PeerId]) {
        let bytes = match message.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, kind = %message, "Dropping unencodable message");
                return;
            }
        };

        match self.transport.send(bytes, to).await {
            Ok(()) => debug!(kind = %message, recipients = to.len(), "Message sent"),
            Err(e) => error!(error = %e, kind = %message, "Send failed, not retrying"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LocalNetwork;
    use treasure_board::Position;

    fn seats() -> Seats {
        Seats::new("a".into(), "b".into()).unwrap()
    }

    #[tokio::test]
    async fn test_board_goes_to_both_players() {
        let network = LocalNetwork::new();
        let mut a = network.join("a".into());
        let mut b = network.join("b".into());
        let dispatcher = Dispatcher::new(network);
        let board = Board::with_treasures(2, 2, &[Position::new(1, 1)]).unwrap();

        dispatcher.broadcast_board(&board, &seats()).await;

        for inbox in [&mut a, &mut b] {
            let message = WireMessage::decode(&inbox.recv().await.unwrap()).unwrap();
            assert_eq!(message, WireMessage::Board(board.clone()));
        }
    }

    #[tokio::test]
    async fn test_status_goes_to_one_player() {
        let network = LocalNetwork::new();
        let mut a = network.join("a".into());
        let mut b = network.join("b".into());
        let dispatcher = Dispatcher::new(network);

        dispatcher
            .send_to_player(&seats(), PlayerSlot::Second, "Score: 1 - 0".into())
            .await;

        let message = WireMessage::decode(&b.recv().await.unwrap()).unwrap();
        assert_eq!(message, WireMessage::Status("Score: 1 - 0".into()));
        assert!(a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let network = LocalNetwork::new();
        let mut a = network.join("a".into());
        let dispatcher = Dispatcher::new(network);
        let board = Board::with_treasures(1, 1, &[]).unwrap();

        // "b" never joined; "a" still gets the board.
        dispatcher.broadcast_board(&board, &seats()).await;
        assert!(a.recv().await.is_some());
    }
}
