//! End-to-end sessions: host actor, in-memory transport and client views.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use treasure_board::{Board, Position};
use treasure_session::{
    ClientUpdate, ClientView, ConnectionState, GamePhase, HostSession, LocalNetwork, MoveRequest,
    PeerId, PlayerSlot, Transport, TransportError, TransportEvent, WireMessage, spawn_host,
};

fn connected(id: &str) -> TransportEvent {
    TransportEvent::ConnectionStateChanged {
        id: id.into(),
        state: ConnectionState::Connected,
    }
}

fn move_from(id: &str, x: usize, y: usize) -> TransportEvent {
    TransportEvent::DataReceived {
        from: id.into(),
        bytes: ClientView::move_request(x, y).unwrap(),
    }
}

/// Applies everything waiting in `inbox`, returning the status texts seen.
fn drain(inbox: &mut mpsc::UnboundedReceiver<Vec<u8>>, view: &mut ClientView) -> Vec<String> {
    let mut statuses = Vec::new();
    while let Ok(bytes) = inbox.try_recv() {
        if let Ok(ClientUpdate::Status(text)) = view.apply(&bytes) {
            statuses.push(text);
        }
    }
    statuses
}

#[tokio::test]
async fn test_two_by_two_single_treasure_match() {
    let network = LocalNetwork::new();
    let mut inbox_0 = network.join("p0".into());
    let mut inbox_1 = network.join("p1".into());
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0)]).unwrap();
    let handle = spawn_host(board, network.clone());

    handle.send(connected("p0")).unwrap();
    handle.send(connected("p1")).unwrap();
    handle.send(move_from("p0", 1, 1)).unwrap();

    let after_first = handle
        .wait_for(|s| s.board().revealed_count() == 1)
        .await
        .unwrap();
    assert_eq!(*after_first.scores(), [0, 0]);
    assert_eq!(*after_first.current_player(), PlayerSlot::Second);
    assert_eq!(*after_first.phase(), GamePhase::InProgress);

    handle.send(move_from("p1", 0, 0)).unwrap();
    let last = handle.shutdown().await.unwrap();
    assert!(last.is_finished());
    assert_eq!(*last.scores(), [0, 1]);

    let mut view_0 = ClientView::new();
    let mut view_1 = ClientView::new();
    assert_eq!(drain(&mut inbox_0, &mut view_0), ["Your Lose! 0 - 1"]);
    assert_eq!(drain(&mut inbox_1, &mut view_1), ["You Win! 1 - 0"]);

    // Both players end with the host's final board.
    assert_eq!(view_0.board().as_ref(), Some(last.board()));
    assert_eq!(view_1.board().as_ref(), Some(last.board()));
}

#[tokio::test]
async fn test_progress_status_goes_to_each_player_own_score_first() {
    let network = LocalNetwork::new();
    let mut inbox_0 = network.join("p0".into());
    let mut inbox_1 = network.join("p1".into());
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0), Position::new(1, 0)]).unwrap();
    let (mut host, _snapshots) = HostSession::new(board, network);

    host.handle_event(connected("p0")).await;
    host.handle_event(connected("p1")).await;
    host.handle_event(move_from("p0", 0, 0)).await;

    let (mut view_0, mut view_1) = (ClientView::new(), ClientView::new());
    assert_eq!(drain(&mut inbox_0, &mut view_0), ["Score: 1 - 0"]);
    assert_eq!(drain(&mut inbox_1, &mut view_1), ["Score: 0 - 1"]);
}

#[tokio::test]
async fn test_tie_reports_draw_to_both() {
    let network = LocalNetwork::new();
    let mut inbox_0 = network.join("p0".into());
    let mut inbox_1 = network.join("p1".into());
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0), Position::new(1, 0)]).unwrap();
    let (mut host, _snapshots) = HostSession::new(board, network);

    for event in [
        connected("p0"),
        connected("p1"),
        move_from("p0", 0, 0),
        move_from("p1", 1, 0),
    ] {
        host.handle_event(event).await;
    }

    assert!(host.snapshot().is_finished());
    let (mut view_0, mut view_1) = (ClientView::new(), ClientView::new());
    assert_eq!(drain(&mut inbox_0, &mut view_0).last().map(String::as_str), Some("Draw! 1 - 1"));
    assert_eq!(drain(&mut inbox_1, &mut view_1).last().map(String::as_str), Some("Draw! 1 - 1"));
}

#[tokio::test]
async fn test_peer_discovered_then_lost_before_connecting() {
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0)]).unwrap();
    let handle = spawn_host(board, LocalNetwork::new());

    handle
        .send(TransportEvent::PeerDiscovered {
            id: "p0".into(),
            display_name: "Player Zero".into(),
        })
        .unwrap();
    handle.send(TransportEvent::PeerLost { id: "p0".into() }).unwrap();

    let snapshot = handle.shutdown().await.unwrap();
    assert!(snapshot.peers().is_empty());
    assert!(!snapshot.connected());
    assert_eq!(*snapshot.phase(), GamePhase::WaitingForPlayers);
}

#[tokio::test]
async fn test_rejected_moves_leave_state_untouched() {
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0)]).unwrap();
    let (mut host, _snapshots) = HostSession::new(board, LocalNetwork::new());

    // Before admission.
    host.handle_event(move_from("p0", 1, 1)).await;
    assert_eq!(host.snapshot().board().revealed_count(), 0);

    host.handle_event(connected("p0")).await;
    host.handle_event(connected("p1")).await;
    let before = host.snapshot();

    let rejected = [
        move_from("p1", 1, 1),
        move_from("p0", 7, 7),
        TransportEvent::DataReceived {
            from: "p0".into(),
            bytes: WireMessage::Move(MoveRequest::new("one", "1")).encode().unwrap(),
        },
        TransportEvent::DataReceived {
            from: "p0".into(),
            bytes: b"\x00\x01".to_vec(),
        },
    ];
    for event in rejected {
        host.handle_event(event).await;
        assert_eq!(host.snapshot(), before);
    }

    host.handle_event(move_from("p0", 1, 1)).await;
    host.handle_event(move_from("p1", 1, 1)).await;
    let snapshot = host.snapshot();
    assert_eq!(snapshot.board().revealed_count(), 1);
    assert_eq!(*snapshot.current_player(), PlayerSlot::Second);
}

#[tokio::test]
async fn test_finished_game_ignores_further_moves() {
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0)]).unwrap();
    let (mut host, _snapshots) = HostSession::new(board, LocalNetwork::new());
    for event in [connected("p0"), connected("p1"), move_from("p0", 0, 0)] {
        host.handle_event(event).await;
    }
    let finished = host.snapshot();
    assert!(finished.is_finished());

    host.handle_event(move_from("p1", 1, 1)).await;
    host.handle_event(move_from("p0", 1, 0)).await;
    assert_eq!(host.snapshot(), finished);
}

#[tokio::test]
async fn test_third_peer_is_tracked_but_not_admitted() {
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0)]).unwrap();
    let (mut host, _snapshots) = HostSession::new(board, LocalNetwork::new());
    for id in ["p0", "p1", "p2"] {
        host.handle_event(connected(id)).await;
    }

    let snapshot = host.snapshot();
    assert_eq!(snapshot.peers().len(), 3);
    let seats = snapshot.seats().clone().unwrap();
    assert_eq!(seats.peers(), [PeerId::new("p0"), PeerId::new("p1")]);
    assert_eq!(seats.slot_of(&"p2".into()), None);

    host.handle_event(move_from("p2", 0, 0)).await;
    assert_eq!(host.snapshot(), snapshot);
}

/// Transport that refuses every send.
struct UnreachableTransport {
    attempts: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Transport for UnreachableTransport {
    async fn send(&self, _bytes: Vec<u8>, to: &[PeerId]) -> Result<(), TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::PeerUnreachable { peer: to[0].clone() })
    }
}

#[tokio::test]
async fn test_send_failures_do_not_affect_game_state() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let transport = UnreachableTransport {
        attempts: Arc::clone(&attempts),
    };
    let board = Board::with_treasures(2, 2, &[Position::new(0, 0)]).unwrap();
    let (mut host, _snapshots) = HostSession::new(board, transport);

    for event in [
        connected("p0"),
        connected("p1"),
        move_from("p0", 1, 1),
        move_from("p1", 0, 0),
    ] {
        host.handle_event(event).await;
    }

    let snapshot = host.snapshot();
    assert!(snapshot.is_finished());
    assert_eq!(*snapshot.scores(), [0, 1]);
    // Admission board, two move boards, two outcome messages; none retried.
    assert_eq!(attempts.load(Ordering::SeqCst), 5);
}
