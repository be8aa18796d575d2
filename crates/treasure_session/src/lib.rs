//! Host-authoritative sessions for two-player treasure hunts.
//!
//! One peer hosts: it owns the [`Board`](treasure_board::Board), arbitrates
//! turns and broadcasts every change. The other peers are thin clients that
//! submit moves and render what they are sent.
//!
//! # Architecture
//!
//! - **Registry**: known peers and their connection states
//! - **Game**: turn ownership, move validation and termination
//! - **Score**: tallies and per-player outcome messages
//! - **Dispatcher**: routes serialized messages over a [`Transport`]
//! - **Host**: a single actor task consuming [`TransportEvent`]s in order
//!
//! # Example
//!
//! ```
//! use treasure_session::{GamePhase, GameState};
//! use treasure_board::{Board, Position};
//!
//! let board = Board::with_treasures(2, 2, &[Position::new(0, 0)])?;
//! let mut game = GameState::new(board);
//! game.admit("alice".into(), "bob".into());
//!
//! game.submit_move(&"alice".into(), 1, 1)?;
//! game.submit_move(&"bob".into(), 0, 0)?;
//! assert_eq!(game.phase(), GamePhase::Finished);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod demo;
mod dispatcher;
mod game;
mod host;
mod peer;
mod registry;
mod score;
mod transport;
mod wire;

pub mod invariants;

pub use client::{ClientUpdate, ClientView};
pub use config::{ConfigError, SessionConfig};
pub use demo::{DemoReport, run_demo};
pub use dispatcher::Dispatcher;
pub use game::{GamePhase, GameState, MoveError, MoveReport};
pub use host::{HostHandle, HostSession, SessionSnapshot, spawn_host};
pub use invariants::GameInvariants;
pub use peer::{ConnectionState, PeerId, PeerSession, PlayerSlot, Seats};
pub use registry::PeerRegistry;
pub use score::{OutcomeEvent, Scoreboard, Verdict};
pub use transport::{LocalNetwork, Transport, TransportError, TransportEvent};
pub use wire::{MoveRequest, WireError, WireMessage};
