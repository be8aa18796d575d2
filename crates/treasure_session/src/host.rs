//! The authoritative host.
//!
//! A single actor owns the registry, the board and the scores. Transport
//! events arrive on an ordered queue and are handled one at a time; after
//! each one the actor publishes an immutable [`SessionSnapshot`] on a watch
//! channel.

use crate::dispatcher::Dispatcher;
use crate::game::{GamePhase, GameState, MoveError};
use crate::peer::{ConnectionState, PeerId, PeerSession, PlayerSlot, Seats};
use crate::registry::PeerRegistry;
use crate::transport::{Transport, TransportError, TransportEvent};
use crate::wire::WireMessage;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use treasure_board::Board;
use tracing::{debug, error, info, instrument, warn};

/// Read-only view of the host state after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionSnapshot {
    /// True iff at least one peer is connected.
    connected: bool,
    /// Game phase.
    phase: GamePhase,
    /// Scores in slot order.
    scores: [usize; 2],
    /// Slot that owns the turn.
    current_player: PlayerSlot,
    /// Admitted players.
    seats: Option<Seats>,
    /// Known peers in discovery order.
    peers: Vec<PeerSession>,
    /// Authoritative board.
    board: Board,
}

impl SessionSnapshot {
    /// Returns true once the game is over.
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }
}

/// Host actor state.
pub struct HostSession<T> {
    registry: PeerRegistry,
    game: GameState,
    dispatcher: Dispatcher<T>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl<T: Transport> HostSession<T> {
    /// Creates a host for `board`, sending through `transport`.
    ///
    /// Returns the session and a receiver of its snapshots.
    #[instrument(skip_all, fields(rows = board.rows(), columns = board.columns(), treasures = board.treasure_count()))]
    pub fn new(board: Board, transport: T) -> (Self, watch::Receiver<SessionSnapshot>) {
        let registry = PeerRegistry::new();
        let game = GameState::new(board);
        let (snapshots, receiver) = watch::channel(Self::capture(&registry, &game));
        info!("Hosting");
        (
            Self {
                registry,
                game,
                dispatcher: Dispatcher::new(transport),
                snapshots,
            },
            receiver,
        )
    }

    /// The peer registry.
    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    /// The game state.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        Self::capture(&self.registry, &self.game)
    }

    /// Subscribes to snapshots.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    fn capture(registry: &PeerRegistry, game: &GameState) -> SessionSnapshot {
        SessionSnapshot {
            connected: registry.is_connected(),
            phase: game.phase(),
            scores: game.scores(),
            current_player: game.current_player(),
            seats: game.seats().cloned(),
            peers: registry.sessions().to_vec(),
            board: game.board().clone(),
        }
    }

    /// Consumes events until every sender is dropped.
    ///
    /// Returns the final snapshot.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<TransportEvent>) -> SessionSnapshot {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        info!(phase = %self.game.phase(), scores = ?self.game.scores(), "Event queue closed, host stopping");
        self.snapshot()
    }

    /// Handles one transport event and publishes the resulting snapshot.
    ///
    /// Never fails: rejected moves, undecodable bytes and send failures are
    /// logged and otherwise ignored.
    pub async fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::PeerDiscovered { id, display_name } => {
                self.registry.on_peer_found(id, display_name);
            }
            TransportEvent::PeerLost { id } => {
                if self.registry.on_peer_lost(&id).is_some() {
                    self.warn_if_seated(&id);
                }
            }
            TransportEvent::ConnectionStateChanged { id, state } => {
                if self.registry.on_connection_state_changed(id.clone(), state) {
                    match state {
                        ConnectionState::Connected => self.on_connected(&id).await,
                        ConnectionState::NotConnected => self.warn_if_seated(&id),
                        ConnectionState::Connecting => {}
                    }
                }
            }
            TransportEvent::DataReceived { from, bytes } => {
                self.on_data(from, &bytes).await;
            }
        }

        self.snapshots.send_replace(self.snapshot());
    }

    async fn on_connected(&mut self, id: &PeerId) {
        if self.game.phase() == GamePhase::WaitingForPlayers {
            self.try_admit().await;
        } else if self.game.seats().and_then(|s| s.slot_of(id)).is_none() {
            warn!(peer = %id, "Rejected admission, two players already seated");
        }
    }

    #[instrument(skip(self))]
    async fn try_admit(&mut self) {
        let mut connected = self.registry.connected_peers().map(|s| s.id().clone());
        let (Some(first), Some(second)) = (connected.next(), connected.next()) else {
            debug!("Waiting for a second connected peer");
            return;
        };
        for extra in connected {
            warn!(peer = %extra, "Rejected admission, two players already seated");
        }

        if !self.game.admit(first, second) {
            return;
        }
        if let Some(seats) = self.game.seats() {
            self.dispatcher.broadcast_board(self.game.board(), seats).await;
        }
    }

    fn warn_if_seated(&self, id: &PeerId) {
        if let Some(slot) = self.game.seats().and_then(|s| s.slot_of(id)) {
            warn!(peer = %id, %slot, phase = %self.game.phase(), "Seated player disconnected");
        }
    }

    #[instrument(skip_all, fields(peer = %from, len = bytes.len()))]
    async fn on_data(&mut self, from: PeerId, bytes: &[u8]) {
        let request = match WireMessage::decode(bytes) {
            Ok(WireMessage::Move(request)) => request,
            Ok(other) => {
                warn!(kind = %other, "Ignoring message only the host sends");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Discarding undecodable message");
                return;
            }
        };

        let position = match request.position() {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Move rejected, tile not found");
                return;
            }
        };

        let report = match self.game.submit_move(&from, position.x, position.y) {
            Ok(report) => report,
            Err(e @ MoveError::InvariantViolation { .. }) => {
                error!(error = %e, "Move broke a game invariant");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Move rejected");
                return;
            }
        };

        info!(
            mover = %report.mover,
            %position,
            treasure = report.treasure,
            next = %report.next,
            "Move accepted"
        );

        let Some(seats) = self.game.seats() else {
            return;
        };
        self.dispatcher.broadcast_board(self.game.board(), seats).await;

        if let Some(outcome) = report.outcome {
            for slot in PlayerSlot::ALL {
                self.dispatcher
                    .send_to_player(seats, slot, outcome.message_for(slot))
                    .await;
            }
        }
    }
}

/// Handle to a host running on its own task.
pub struct HostHandle {
    events: mpsc::UnboundedSender<TransportEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<SessionSnapshot>,
}

/// Starts a host actor on a new task.
#[instrument(skip_all)]
pub fn spawn_host<T>(board: Board, transport: T) -> HostHandle
where
    T: Transport + 'static,
{
    let (session, snapshots) = HostSession::new(board, transport);
    let (events, receiver) = mpsc::unbounded_channel();
    let task = tokio::spawn(session.run(receiver));
    HostHandle {
        events,
        snapshots,
        task,
    }
}

impl HostHandle {
    /// A sender for feeding transport events to the host.
    pub fn events(&self) -> mpsc::UnboundedSender<TransportEvent> {
        self.events.clone()
    }

    /// Queues one event.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] if the host has stopped.
    pub fn send(&self, event: TransportEvent) -> Result<(), TransportError> {
        self.events.send(event).map_err(|_| TransportError::Closed {
            message: "host stopped".to_string(),
        })
    }

    /// A receiver of snapshots.
    pub fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Waits until a published snapshot satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] if the host stops first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, TransportError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| TransportError::Closed {
                message: "host stopped".to_string(),
            })?;
        Ok(SessionSnapshot::clone(&snapshot))
    }

    /// Closes this handle's event sender and waits for the host to drain
    /// its queue.
    ///
    /// The host only stops once every other sender from [`Self::events`] is
    /// dropped too.
    ///
    /// # Errors
    ///
    /// Returns the join error if the host task panicked.
    pub async fn shutdown(self) -> Result<SessionSnapshot, JoinError> {
        drop(self.events);
        self.task.await
    }
}
