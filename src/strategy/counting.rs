//! Card-counting strategy.
//!
//! Uses the multiset of cards it has not seen to steer play:
//!
//! - rank match available: switch to the suit it holds most of
//! - only suit matches: play the rank that is rarest among unseen cards,
//!   leaving opponents least likely to follow
//! - stacking cards are a last resort, and never stacked onto a live stack
//! - jumps only when a non-stacking follow-up stays in hand
//! - discards stacking cards first, then the least flexible card

use rustc_hash::FxHashMap;

use crate::core::{Card, Suit};

use super::traits::{PlayDecision, SeatView, Strategy, TurnInfo};

#[derive(Clone, Copy, Debug, Default)]
pub struct CountingStrategy;

impl CountingStrategy {
    pub const NAME: &'static str = "counting";
}

fn suit_counts<'a>(cards: impl IntoIterator<Item = &'a Card>) -> FxHashMap<Suit, usize> {
    let mut counts = FxHashMap::default();
    for card in cards {
        *counts.entry(card.suit).or_insert(0) += 1;
    }
    counts
}

fn rank_counts<'a>(cards: impl IntoIterator<Item = &'a Card>) -> FxHashMap<u8, usize> {
    let mut counts = FxHashMap::default();
    for card in cards {
        *counts.entry(card.rank).or_insert(0) += 1;
    }
    counts
}

impl Strategy for CountingStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn pick_jump_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> Option<Card> {
        let stacking = view.rules().stacking_rank;
        let hand = view.hand().as_slice();

        view.jumpable(turn.top_card).find(|jump| {
            // Skip exactly one copy of the jump card
            let mut skipped = false;
            hand.iter().any(|card| {
                if !skipped && card == jump {
                    skipped = true;
                    return false;
                }
                card.rank != stacking && card.matches_for_play(jump)
            })
        })
    }

    fn pick_play_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> PlayDecision {
        let stacking = view.rules().stacking_rank;
        let top = turn.top_card;
        let (sevens, others): (Vec<Card>, Vec<Card>) =
            view.playable(top).partition(|c| c.rank == stacking);

        if !others.is_empty() {
            let rank_matches: Vec<Card> =
                others.iter().copied().filter(|c| c.rank == top.rank).collect();
            if !rank_matches.is_empty() {
                let held = suit_counts(view.hand());
                if let Some(best) = rank_matches
                    .iter()
                    .copied()
                    .rev()
                    .max_by_key(|c| held.get(&c.suit).copied().unwrap_or(0))
                {
                    return PlayDecision::Play(best);
                }
            }

            let unseen = view.cards_not_viewed();
            let unseen_ranks = rank_counts(&unseen);
            if let Some(best) = others
                .iter()
                .copied()
                .min_by_key(|c| unseen_ranks.get(&c.rank).copied().unwrap_or(0))
            {
                return PlayDecision::Play(best);
            }
        }

        match sevens.first() {
            Some(_) if turn.stack_count > 0 => PlayDecision::Pass,
            Some(card) => PlayDecision::Play(*card),
            None => PlayDecision::Draw,
        }
    }

    fn discard_card(&mut self, view: &SeatView<'_>, _turn: &TurnInfo) -> Card {
        let stacking = view.rules().stacking_rank;
        let hand = view.hand().as_slice();
        if let Some(seven) = hand.iter().find(|c| c.rank == stacking) {
            return *seven;
        }

        let suits = suit_counts(hand);
        let ranks = rank_counts(hand);
        hand.iter()
            .copied()
            .min_by_key(|c| suits[&c.suit] + ranks[&c.rank])
            .unwrap_or(hand[0])
    }
}
