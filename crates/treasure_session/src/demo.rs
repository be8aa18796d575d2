//! A full local match: the host actor plus two automated joiners.

use crate::client::{ClientUpdate, ClientView};
use crate::config::SessionConfig;
use crate::host::{SessionSnapshot, spawn_host};
use crate::peer::{ConnectionState, PeerId, PlayerSlot};
use crate::transport::{LocalNetwork, TransportEvent};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use treasure_board::Board;

/// How a demo match ended.
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Host state after the match.
    pub snapshot: SessionSnapshot,
    /// Each player's final view, in slot order.
    pub views: [ClientView; 2],
}

impl DemoReport {
    /// Final board.
    pub fn board(&self) -> &Board {
        self.snapshot.board()
    }

    /// Last status each player received, in slot order.
    pub fn messages(&self) -> [Option<&str>; 2] {
        [
            self.views[0].status().as_deref(),
            self.views[1].status().as_deref(),
        ]
    }
}

/// A joiner that reveals random hidden tiles on its turn.
struct Bot {
    id: PeerId,
    slot: PlayerSlot,
    view: ClientView,
    inbox: mpsc::UnboundedReceiver<Vec<u8>>,
    events: mpsc::UnboundedSender<TransportEvent>,
    rng: StdRng,
}

impl Bot {
    /// Plays until the inbox closes. Returns the final view.
    #[instrument(skip(self), fields(peer = %self.id, slot = %self.slot))]
    async fn run(mut self) -> ClientView {
        while let Some(bytes) = self.inbox.recv().await {
            match self.view.apply(&bytes) {
                Ok(ClientUpdate::Board) => self.maybe_move(),
                Ok(ClientUpdate::Status(text)) => info!(%text, "Status"),
                Err(e) => warn!(error = %e, "Ignoring message"),
            }
        }
        debug!("Inbox closed");
        self.view
    }

    /// Each accepted move reveals one tile, so the revealed count's parity
    /// tells whose turn it is.
    fn maybe_move(&mut self) {
        if self.view.is_over() {
            return;
        }
        let Some(board) = self.view.board() else {
            return;
        };
        if board.revealed_count() % 2 != self.slot.index() {
            return;
        }

        let hidden = self.view.hidden_tiles();
        let Some(&target) = hidden.choose(&mut self.rng) else {
            return;
        };
        let bytes = match ClientView::move_request(target.x, target.y) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Could not encode move");
                return;
            }
        };

        debug!(%target, "Moving");
        let event = TransportEvent::DataReceived {
            from: self.id.clone(),
            bytes,
        };
        if self.events.send(event).is_err() {
            warn!("Host stopped");
        }
    }
}

/// Runs one match to completion.
///
/// Players join in slot order, so the first joiner moves first.
///
/// # Errors
///
/// Fails if the configuration is invalid or a task dies.
#[instrument(skip(config), fields(seed = ?config.seed()))]
pub async fn run_demo(config: &SessionConfig) -> Result<DemoReport> {
    let board = config.board()?;
    info!(
        rows = board.rows(),
        columns = board.columns(),
        treasures = board.treasure_count(),
        "Starting demo"
    );

    let network = LocalNetwork::new();
    let handle = spawn_host(board, network.clone());

    let mut players = Vec::with_capacity(2);
    for slot in PlayerSlot::ALL {
        let number = slot.index() + 1;
        let id = PeerId::new(format!("player-{number}"));
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(number as u64)),
            None => StdRng::from_os_rng(),
        };

        let bot = Bot {
            id: id.clone(),
            slot,
            view: ClientView::new(),
            inbox: network.join(id.clone()),
            events: handle.events(),
            rng,
        };

        handle.send(TransportEvent::PeerDiscovered {
            id: id.clone(),
            display_name: format!("{} {number}", config.display_name()),
        })?;
        handle.send(TransportEvent::ConnectionStateChanged {
            id: id.clone(),
            state: ConnectionState::Connected,
        })?;

        players.push((id, tokio::spawn(bot.run())));
    }

    let finished = handle.wait_for(SessionSnapshot::is_finished).await?;
    info!(scores = ?finished.scores(), "Match finished");

    let mut views = Vec::with_capacity(2);
    for (id, task) in players {
        network.leave(&id);
        views.push(task.await.context("player task failed")?);
    }

    let snapshot = handle.shutdown().await.context("host task failed")?;
    let views: [ClientView; 2] = views
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected two players"))?;

    Ok(DemoReport { snapshot, views })
}
