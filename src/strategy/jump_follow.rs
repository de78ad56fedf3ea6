//! Selective jumping strategy.
//!
//! Plays like `first` on its own turn, but jumps in only when the jump is
//! worth it: always on a stacking card, otherwise only if some different
//! card in hand could follow the jumped card.

use crate::core::Card;

use super::traits::{PlayDecision, SeatView, Strategy, TurnInfo};

#[derive(Clone, Copy, Debug, Default)]
pub struct JumpFollowStrategy;

impl JumpFollowStrategy {
    pub const NAME: &'static str = "jump_follow";
}

impl Strategy for JumpFollowStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn pick_jump_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> Option<Card> {
        let top = turn.top_card;
        let card = view.jumpable(top).next()?;
        if top.rank == view.rules().stacking_rank {
            return Some(card);
        }
        view.playable(top).any(|other| other != top).then_some(card)
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
