//! Peer identities, connection states and player seating.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Opaque identity of a remote endpoint, as reported by the transport.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    /// Creates a peer identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Connection state of a peer as reported by the transport.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    /// No active connection.
    NotConnected,
    /// Handshake in progress.
    Connecting,
    /// Connected and able to exchange data.
    Connected,
}

/// A known remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PeerSession {
    /// Transport identity.
    id: PeerId,
    /// Name advertised by the peer.
    display_name: String,
    /// Last reported connection state.
    state: ConnectionState,
}

impl PeerSession {
    /// Returns true if the peer is connected.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub(crate) fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
    }
}

/// Which of the two seats a player occupies.
///
/// `First` moves first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSlot {
    /// Seated by the first peer to connect.
    First,
    /// Seated by the second peer to connect.
    Second,
}

impl PlayerSlot {
    /// Both slots in turn order.
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::First, PlayerSlot::Second];

    /// Returns the other slot.
    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::First => PlayerSlot::Second,
            PlayerSlot::Second => PlayerSlot::First,
        }
    }

    /// Returns 0 for `First` and 1 for `Second`.
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::First => 0,
            PlayerSlot::Second => 1,
        }
    }
}

/// The two admitted players, each bound to a slot at admission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    first: PeerId,
    second: PeerId,
}

impl Seats {
    /// Seats two distinct peers.
    ///
    /// Returns `None` if both identities are the same peer.
    pub fn new(first: PeerId, second: PeerId) -> Option<Self> {
        (first != second).then_some(Self { first, second })
    }

    /// Returns the peer seated in `slot`.
    pub fn peer(&self, slot: PlayerSlot) -> &PeerId {
        match slot {
            PlayerSlot::First => &self.first,
            PlayerSlot::Second => &self.second,
        }
    }

    /// Returns the slot held by `peer`, if seated.
    pub fn slot_of(&self, peer: &PeerId) -> Option<PlayerSlot> {
        PlayerSlot::ALL
            .into_iter()
            .find(|&slot| self.peer(slot) == peer)
    }

    /// Both players in slot order.
    pub fn peers(&self) -> [PeerId; 2] {
        [self.first.clone(), self.second.clone()]
    }
}
