//! Follow-up maximizing strategy.
//!
//! Scores every candidate card by how many other cards in hand could be
//! played on top of it, and plays the one that keeps the most options open.

use crate::core::Card;

use super::traits::{PlayDecision, SeatView, Strategy, TurnInfo};

/// Stack depth past which a lone stacking card is held back.
const MAX_STACK_TO_JOIN: u32 = 5;

#[derive(Clone, Copy, Debug, Default)]
pub struct FollowUpStrategy;

impl FollowUpStrategy {
    pub const NAME: &'static str = "follow_up";
}

/// Cards in `hand` (besides one copy of `card`) playable on `card`.
fn follow_ups(hand: &[Card], card: &Card) -> usize {
    let mut skipped = false;
    hand.iter()
        .filter(|other| {
            if !skipped && *other == card {
                skipped = true;
                return false;
            }
            other.matches_for_play(card)
        })
        .count()
}

impl Strategy for FollowUpStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn pick_jump_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> Option<Card> {
        let stacking = view.rules().stacking_rank;
        let hand = view.hand().as_slice();

        let mut best: Option<(Card, usize)> = None;
        for card in view.jumpable(turn.top_card) {
            let score = follow_ups(hand, &card);
            if card.rank == stacking && score > 0 {
                return Some(card);
            }
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((card, score));
            }
        }
        best.map(|(card, _)| card)
    }

    fn pick_play_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> PlayDecision {
        let rules = view.rules();
        let hand = view.hand().as_slice();
        let top = turn.top_card;

        let mut ranked: Vec<(Card, usize)> = view
            .playable(top)
            .map(|card| (card, follow_ups(hand, &card)))
            .collect();
        if ranked.is_empty() {
            return PlayDecision::Draw;
        }
        // Stable: ties keep hand order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut choice = 0;
        if ranked[choice].0.rank == rules.stacking_rank
            && top.rank == rules.stacking_rank
            && ranked.len() > choice + 1
        {
            choice += 1;
        }

        // After a reversal the turn goes back the way it came
        let behind = view.next_seat(turn.direction.reversed());
        if ranked[choice].0.rank == rules.reverse_rank
            && view.hand_size_of(behind) == 1
            && ranked.len() > choice + 1
        {
            choice += 1;
        }

        let card = ranked[choice].0;
        let lone_stacker = ranked.len() == 1 && card.rank == rules.stacking_rank;
        if lone_stacker && turn.stack_count > MAX_STACK_TO_JOIN {
            return PlayDecision::Pass;
        }
        PlayDecision::Play(card)
    }

    fn discard_card(&mut self, view: &SeatView<'_>, _turn: &TurnInfo) -> Card {
        let hand = view.hand().as_slice();
        hand.iter()
            .copied()
            .min_by_key(|card| {
                let duplicates = hand.iter().filter(|c| *c == card).count();
                let connections = hand.iter().filter(|c| card.matches_for_play(c)).count();
                (duplicates, connections)
            })
            .unwrap_or(hand[0])
    }
}
