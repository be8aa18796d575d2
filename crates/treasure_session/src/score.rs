//! Score tallying and outcome messages.

use crate::peer::PlayerSlot;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Running scores for both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    scores: [usize; 2],
    treasure_count: usize,
}

impl Scoreboard {
    /// Creates a scoreboard for a board holding `treasure_count` treasures.
    pub fn new(treasure_count: usize) -> Self {
        Self {
            scores: [0, 0],
            treasure_count,
        }
    }

    /// Scores in slot order.
    pub fn scores(&self) -> [usize; 2] {
        self.scores
    }

    /// Score of one player.
    pub fn score(&self, slot: PlayerSlot) -> usize {
        self.scores[slot.index()]
    }

    /// Sum of both scores.
    pub fn total(&self) -> usize {
        self.scores[0] + self.scores[1]
    }

    /// Treasures on the board.
    pub fn treasure_count(&self) -> usize {
        self.treasure_count
    }

    /// Returns true once every treasure has been found.
    pub fn is_complete(&self) -> bool {
        self.total() >= self.treasure_count
    }

    /// Awards one treasure to `slot`.
    ///
    /// The total never exceeds the treasure count: once complete, further
    /// calls leave the scores as they are and report the final outcome.
    #[instrument(skip(self), fields(scores = ?self.scores))]
    pub fn apply_score(&mut self, slot: PlayerSlot) -> OutcomeEvent {
        if !self.is_complete() {
            self.scores[slot.index()] += 1;
        }

        if self.is_complete() {
            info!(scores = ?self.scores, "All treasures found");
            OutcomeEvent::Finished {
                scores: self.scores,
            }
        } else {
            OutcomeEvent::Progress {
                scores: self.scores,
            }
        }
    }
}

/// Result of a scoring reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeEvent {
    /// Treasures remain.
    Progress {
        /// Scores in slot order.
        scores: [usize; 2],
    },
    /// The last treasure was found.
    Finished {
        /// Final scores in slot order.
        scores: [usize; 2],
    },
}

/// How a finished game ended for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Verdict {
    /// Strictly more treasure than the opponent.
    Win,
    /// Strictly less treasure than the opponent.
    Lose,
    /// Equal scores.
    Draw,
}

impl OutcomeEvent {
    /// Scores in slot order.
    pub fn scores(&self) -> [usize; 2] {
        match self {
            OutcomeEvent::Progress { scores } | OutcomeEvent::Finished { scores } => *scores,
        }
    }

    /// Returns true if the game is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OutcomeEvent::Finished { .. })
    }

    /// Own score then opponent score, from `slot`'s point of view.
    pub fn perspective(&self, slot: PlayerSlot) -> (usize, usize) {
        let scores = self.scores();
        (scores[slot.index()], scores[slot.opponent().index()])
    }

    /// Final verdict for `slot`, or `None` while the game continues.
    pub fn verdict(&self, slot: PlayerSlot) -> Option<Verdict> {
        if !self.is_terminal() {
            return None;
        }
        let (own, opponent) = self.perspective(slot);
        Some(match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => Verdict::Win,
            std::cmp::Ordering::Less => Verdict::Lose,
            std::cmp::Ordering::Equal => Verdict::Draw,
        })
    }

    /// Status text sent to the player in `slot`. Own score comes first.
    pub fn message_for(&self, slot: PlayerSlot) -> String {
        let (own, opponent) = self.perspective(slot);
        match self.verdict(slot) {
            None => format!("Score: {own} - {opponent}"),
            Some(Verdict::Win) => format!("You Win! {own} - {opponent}"),
            Some(Verdict::Lose) => format!("Your Lose! {own} - {opponent}"),
            Some(Verdict::Draw) => format!("Draw! {own} - {opponent}"),
        }
    }
}
