//! Registry of known peers and their connection states.

use crate::peer::{ConnectionState, PeerId, PeerSession};
use tracing::{debug, info, instrument};

/// Known peers in discovery order.
///
/// Insertion order is preserved and decides seating: the first two peers to
/// be connected, in registry order, become the first and second player.
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    sessions: Vec<PeerSession>,
}

impl PeerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly discovered peer as `Connecting`.
    ///
    /// Returns false if the peer was already known; its entry is left as is.
    #[instrument(skip(self))]
    pub fn on_peer_found(&mut self, id: PeerId, display_name: String) -> bool {
        if self.contains(&id) {
            debug!(peer = %id, "Peer already known");
            return false;
        }

        info!(peer = %id, %display_name, "Peer discovered");
        self.sessions
            .push(PeerSession::new(id, display_name, ConnectionState::Connecting));
        true
    }

    /// Forgets a peer.
    ///
    /// Returns the removed entry, or `None` if the peer was unknown.
    #[instrument(skip(self))]
    pub fn on_peer_lost(&mut self, id: &PeerId) -> Option<PeerSession> {
        let index = self.sessions.iter().position(|s| s.id() == id)?;
        let session = self.sessions.remove(index);
        info!(peer = %id, connected = self.is_connected(), "Peer lost");
        Some(session)
    }

    /// Applies a connection-state report from the transport.
    ///
    /// - `Connected` inserts the peer if unknown and marks it connected.
    /// - `Connecting` updates a known peer without removing it.
    /// - `NotConnected` removes the peer.
    ///
    /// Returns true if the registry changed.
    #[instrument(skip(self))]
    pub fn on_connection_state_changed(&mut self, id: PeerId, state: ConnectionState) -> bool {
        match state {
            ConnectionState::NotConnected => self.on_peer_lost(&id).is_some(),
            ConnectionState::Connecting | ConnectionState::Connected => {
                if let Some(session) = self.sessions.iter_mut().find(|s| s.id() == &id) {
                    if *session.state() == state {
                        return false;
                    }
                    session.set_state(state);
                } else {
                    let display_name = id.to_string();
                    self.sessions.push(PeerSession::new(id.clone(), display_name, state));
                }
                info!(peer = %id, %state, connected = self.is_connected(), "Connection state changed");
                true
            }
        }
    }

    /// Returns true if the peer is known.
    pub fn contains(&self, id: &PeerId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the entry for a peer.
    pub fn get(&self, id: &PeerId) -> Option<&PeerSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    /// All known peers in discovery order.
    pub fn sessions(&self) -> &[PeerSession] {
        &self.sessions
    }

    /// Connected peers in discovery order.
    pub fn connected_peers(&self) -> impl Iterator<Item = &PeerSession> {
        self.sessions.iter().filter(|s| s.is_connected())
    }

    /// True iff at least one peer reports an active connection.
    pub fn is_connected(&self) -> bool {
        self.connected_peers().next().is_some()
    }

    /// Number of known peers.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no peers are known.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
