//! Deterministic first-legal-card baseline.

use crate::core::Card;

use super::traits::{PlayDecision, SeatView, Strategy, TurnInfo};

/// Always takes the first legal option in hand order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstStrategy;

impl FirstStrategy {
    pub const NAME: &'static str = "first";
}

impl Strategy for FirstStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn pick_jump_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> Option<Card> {
        view.jumpable(turn.top_card).next()
    }

    fn pick_play_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> PlayDecision {
        view.playable(turn.top_card)
            .next()
            .map_or(PlayDecision::Draw, PlayDecision::Play)
    }

    fn discard_card(&mut self, view: &SeatView<'_>, _turn: &TurnInfo) -> Card {
        view.hand().as_slice()[0]
    }
}
