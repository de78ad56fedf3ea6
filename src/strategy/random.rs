//! Uniform random baseline.

use crate::core::{Card, GameRng};

use super::traits::{PlayDecision, SeatView, Strategy, TurnInfo};

/// Picks uniformly among its legal options.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    rng: GameRng,
}

impl RandomStrategy {
    pub const NAME: &'static str = "random";

    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: GameRng::new(seed) }
    }

    fn pick(&mut self, options: &[Card]) -> Option<Card> {
        self.rng.choose(options).copied()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn pick_jump_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> Option<Card> {
        let options: Vec<Card> = view.jumpable(turn.top_card).collect();
        self.pick(&options)
    }

    fn pick_play_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> PlayDecision {
        let options: Vec<Card> = view.playable(turn.top_card).collect();
        self.pick(&options).map_or(PlayDecision::Draw, PlayDecision::Play)
    }

    fn discard_card(&mut self, view: &SeatView<'_>, _turn: &TurnInfo) -> Card {
        let hand = view.hand().as_slice();
        hand[self.rng.gen_range_usize(0..hand.len())]
    }
}
