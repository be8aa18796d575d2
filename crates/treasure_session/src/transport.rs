//! Transport boundary: inbound events and outbound sends.
//!
//! Real discovery and connection handling live outside this crate. The host
//! only sees [`TransportEvent`]s in delivery order and a [`Transport`] to
//! send bytes with. [`LocalNetwork`] is an in-memory implementation used by
//! the demo and tests.

use crate::peer::{ConnectionState, PeerId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Something the transport observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A peer advertised itself.
    PeerDiscovered {
        /// Transport identity.
        id: PeerId,
        /// Advertised name.
        display_name: String,
    },
    /// A peer disappeared.
    PeerLost {
        /// Transport identity.
        id: PeerId,
    },
    /// A peer's connection state changed.
    ConnectionStateChanged {
        /// Transport identity.
        id: PeerId,
        /// New state.
        state: ConnectionState,
    },
    /// Bytes arrived from a peer.
    DataReceived {
        /// Sender.
        from: PeerId,
        /// Raw payload.
        bytes: Vec<u8>,
    },
}

/// Transport send errors.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TransportError {
    /// No open route to the peer.
    #[display("Peer {peer} is unreachable")]
    PeerUnreachable {
        /// Intended recipient.
        peer: PeerId,
    },

    /// The transport has shut down.
    #[display("Transport closed: {message}")]
    Closed {
        /// Reason.
        message: String,
    },
}

/// Ordered, reliable delivery of bytes to connected peers.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends `bytes` to every peer in `to`.
    ///
    /// Delivery is attempted to all recipients even if some fail; the first
    /// failure is reported.
    async fn send(&self, bytes: Vec<u8>, to: &[PeerId]) -> Result<(), TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, bytes: Vec<u8>, to: &[PeerId]) -> Result<(), TransportError> {
        (**self).send(bytes, to).await
    }
}

type Mailboxes = HashMap<PeerId, mpsc::UnboundedSender<Vec<u8>>>;

/// In-memory transport routing bytes to per-peer mailboxes.
///
/// Clones share the same mailboxes.
#[derive(Debug, Clone, Default)]
pub struct LocalNetwork {
    mailboxes: Arc<Mutex<Mailboxes>>,
}

impl LocalNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a mailbox for `id` and returns its receiving end.
    ///
    /// Joining again replaces the previous mailbox.
    #[instrument(skip(self))]
    pub fn join(&self, id: PeerId) -> mpsc::UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.lock().insert(id.clone(), tx).is_some() {
            warn!(peer = %id, "Replaced existing mailbox");
        } else {
            info!(peer = %id, "Joined local network");
        }
        rx
    }

    /// Closes the mailbox for `id`.
    ///
    /// Returns false if the peer had not joined.
    #[instrument(skip(self))]
    pub fn leave(&self, id: &PeerId) -> bool {
        let removed = self.lock().remove(id).is_some();
        if removed {
            info!(peer = %id, "Left local network");
        }
        removed
    }

    /// Returns true if `id` has an open mailbox.
    pub fn is_joined(&self, id: &PeerId) -> bool {
        self.lock().contains_key(id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Mailboxes> {
        self.mailboxes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl Transport for LocalNetwork {
    #[instrument(skip(self, bytes), fields(len = bytes.len(), recipients = to.len()))]
    async fn send(&self, bytes: Vec<u8>, to: &[PeerId]) -> Result<(), TransportError> {
        let mailboxes = self.lock();
        let mut first_failure = None;

        for peer in to {
            let delivered = mailboxes
                .get(peer)
                .is_some_and(|mailbox| mailbox.send(bytes.clone()).is_ok());
            if delivered {
                debug!(%peer, "Delivered");
            } else if first_failure.is_none() {
                first_failure = Some(TransportError::PeerUnreachable { peer: peer.clone() });
            }
        }

        first_failure.map_or(Ok(()), Err)
    }
}
