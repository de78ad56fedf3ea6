//! The strategy capability and the view a strategy decides from.
//!
//! The engine hands a fresh `SeatView` to a strategy on every call. The view
//! borrows the seat's own hand, the discard pile, the reference deck and the
//! public hand sizes; nothing in it reaches another seat's hand. Because the
//! borrows are shared, a strategy can read the table but never change it:
//! every mutation happens in the engine, based on the decision returned.

use rustc_hash::FxHashMap;

use crate::core::{Card, Direction, Pile, RuleSet, SeatId, SeatMap};

/// Public facts about the decision point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnInfo {
    /// Face-up card every play or jump is matched against.
    pub top_card: Card,
    /// Seat whose turn it is.
    pub current_player: SeatId,
    pub direction: Direction,
    /// Consecutive stacking-rank cards played so far.
    pub stack_count: u32,
}

/// Outcome of a regular-turn decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayDecision {
    /// Play this card from hand. Must match the top card for play.
    Play(Card),
    /// No card chosen; draw one.
    Draw,
    /// Deliberately decline; also draws one card but counts as a
    /// successful decision in the playability statistics.
    Pass,
}

/// What a seat is allowed to see.
#[derive(Clone, Copy, Debug)]
pub struct SeatView<'a> {
    seat: SeatId,
    hand: &'a Pile,
    discard: &'a Pile,
    reference_deck: &'a [Card],
    hand_sizes: &'a SeatMap<usize>,
    rules: &'a RuleSet,
}

impl<'a> SeatView<'a> {
    pub fn new(
        seat: SeatId,
        hand: &'a Pile,
        discard: &'a Pile,
        reference_deck: &'a [Card],
        hand_sizes: &'a SeatMap<usize>,
    ) -> Self {
        Self {
            seat,
            hand,
            discard,
            reference_deck,
            hand_sizes,
            rules: &RuleSet::STANDARD,
        }
    }

    /// Use table rules other than the standard ones.
    #[must_use]
    pub fn with_rules(mut self, rules: &'a RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Table rules in force.
    #[must_use]
    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// The seat this view belongs to.
    #[must_use]
    pub fn seat(&self) -> SeatId {
        self.seat
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hand_sizes.seat_count()
    }

    /// The seat's own hand.
    #[must_use]
    pub fn hand(&self) -> &'a Pile {
        self.hand
    }

    #[must_use]
    pub fn discard(&self) -> &'a Pile {
        self.discard
    }

    /// Every card in play, for all decks.
    #[must_use]
    pub fn reference_deck(&self) -> &'a [Card] {
        self.reference_deck
    }

    /// Hand size of every seat.
    #[must_use]
    pub fn hand_sizes(&self) -> &'a SeatMap<usize> {
        self.hand_sizes
    }

    #[must_use]
    pub fn hand_size_of(&self, seat: SeatId) -> usize {
        self.hand_sizes[seat]
    }

    /// The neighbouring seat in `direction`.
    #[must_use]
    pub fn next_seat(&self, direction: Direction) -> SeatId {
        self.seat.step(direction, self.player_count())
    }

    /// Cards in hand that can be played on `top`, in hand order.
    pub fn playable(&self, top: Card) -> impl Iterator<Item = Card> + 'a {
        self.hand.iter().copied().filter(move |c| c.matches_for_play(&top))
    }

    /// Cards in hand that can jump in on `top`, in hand order.
    pub fn jumpable(&self, top: Card) -> impl Iterator<Item = Card> + 'a {
        self.hand.iter().copied().filter(move |c| c.matches_for_jump(&top))
    }

    /// Cards neither in this seat's hand nor in the discard pile.
    ///
    /// These are the cards that could be in the draw pile, in an opponent's
    /// hand, or face-up on top. Each viewed copy cancels exactly one copy of
    /// the reference deck, so multi-deck duplicates are counted correctly.
    #[must_use]
    pub fn cards_not_viewed(&self) -> Pile {
        let mut viewed: FxHashMap<Card, usize> = self.hand.multiset();
        for card in self.discard {
            *viewed.entry(*card).or_insert(0) += 1;
        }

        let mut not_viewed = Pile::new();
        for card in self.reference_deck {
            match viewed.get_mut(card) {
                Some(count) if *count > 0 => *count -= 1,
                _ => not_viewed.add(*card),
            }
        }
        not_viewed
    }
}

/// A player controller.
///
/// All three decisions are synchronous and must not block. `discard_card`
/// is only called during a pause, while the seat holds more cards than the
/// hand ceiling, so the hand is never empty there.
pub trait Strategy: Send {
    /// Stable name used in registries, file names and reports.
    fn name(&self) -> &'static str;

    /// Offer an identical card to jump in, or `None` to let the turn pass.
    fn pick_jump_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> Option<Card>;

    /// Decide the regular play for the seat whose turn it is.
    fn pick_play_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> PlayDecision;

    /// Surrender one card from hand during a pause.
    fn discard_card(&mut self, view: &SeatView<'_>, turn: &TurnInfo) -> Card;
}

impl std::fmt::Debug for dyn Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}()", self.name())
    }
}
