//! Per-game results.

use serde::{Deserialize, Serialize};

use crate::core::{Card, SeatId, SeatMap};

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// A seat emptied its hand.
    Won(SeatId),
    /// The step budget ran out first.
    Truncated,
}

/// Everything the engine reports about one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub outcome: GameOutcome,

    /// Decision steps taken, including illegal-play retries.
    pub steps: u64,

    /// Times the pause protocol ran.
    pub pauses: usize,

    pub illegal_plays: SeatMap<u64>,
    pub illegal_jumps: SeatMap<u64>,
    pub jumps: SeatMap<u64>,

    /// Every card that became the top card, starting with the flipped one.
    pub top_cards: Vec<Card>,
}

impl GameRecord {
    #[must_use]
    pub fn new(player_count: usize, first_top: Card) -> Self {
        Self {
            outcome: GameOutcome::Truncated,
            steps: 0,
            pauses: 0,
            illegal_plays: SeatMap::with_value(player_count, 0),
            illegal_jumps: SeatMap::with_value(player_count, 0),
            jumps: SeatMap::with_value(player_count, 0),
            top_cards: vec![first_top],
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<SeatId> {
        match self.outcome {
            GameOutcome::Won(seat) => Some(seat),
            GameOutcome::Truncated => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.winner().is_some()
    }
}
