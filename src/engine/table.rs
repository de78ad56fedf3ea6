//! Table state: every pile, the top card and the turn bookkeeping.
//!
//! Cards only ever move between the draw pile, the discard pile, the hands
//! and the top card slot, so the total is fixed for the life of a table.
//! `check_integrity` verifies exactly that.

use rustc_hash::FxHashMap;

use crate::core::{Card, Direction, GameRng, Pile, Result, RuleSet, SeatId, SeatMap, SimError};
use crate::strategy::{SeatView, TurnInfo};

/// All mutable state of one table.
#[derive(Clone, Debug)]
pub struct Table {
    draw: Pile,
    discard: Pile,
    hands: SeatMap<Pile>,
    hand_sizes: SeatMap<usize>,
    top: Option<Card>,
    direction: Direction,
    stack_count: u32,
    current: SeatId,
    reference: Vec<Card>,
    rules: RuleSet,
}

impl Table {
    /// A table with every card of `reference` in the draw pile.
    pub fn new(player_count: usize, reference: Vec<Card>, rules: RuleSet) -> Self {
        Self {
            draw: Pile::from_cards(reference.clone()),
            discard: Pile::new(),
            hands: SeatMap::with_default(player_count),
            hand_sizes: SeatMap::with_value(player_count, 0),
            top: None,
            direction: Direction::Forward,
            stack_count: 0,
            current: SeatId::new(0),
            reference,
            rules,
        }
    }

    /// A table in a given mid-game position.
    ///
    /// The reference multiset is everything placed on the table. Useful for
    /// replaying a known position one decision at a time.
    pub fn arranged(
        hands: Vec<Vec<Card>>,
        top: Card,
        draw: Vec<Card>,
        discard: Vec<Card>,
        rules: RuleSet,
    ) -> Self {
        let mut reference: Vec<Card> = hands.iter().flatten().copied().collect();
        reference.extend(draw.iter().copied());
        reference.extend(discard.iter().copied());
        reference.push(top);

        let player_count = hands.len();
        let hands =
            SeatMap::new(player_count, |seat| Pile::from_cards(hands[seat.index()].clone()));
        let hand_sizes = SeatMap::new(player_count, |seat| hands[seat].len());

        Self {
            draw: Pile::from_cards(draw),
            discard: Pile::from_cards(discard),
            hands,
            hand_sizes,
            top: Some(top),
            direction: Direction::Forward,
            stack_count: 0,
            current: SeatId::new(0),
            reference,
            rules,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.seat_count()
    }

    #[must_use]
    pub fn draw_pile(&self) -> &Pile {
        &self.draw
    }

    #[must_use]
    pub fn discard_pile(&self) -> &Pile {
        &self.discard
    }

    #[must_use]
    pub fn hand(&self, seat: SeatId) -> &Pile {
        &self.hands[seat]
    }

    #[must_use]
    pub fn hand_sizes(&self) -> &SeatMap<usize> {
        &self.hand_sizes
    }

    #[must_use]
    pub fn top_card(&self) -> Option<Card> {
        self.top
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn stack_count(&self) -> u32 {
        self.stack_count
    }

    #[must_use]
    pub fn current_player(&self) -> SeatId {
        self.current
    }

    #[must_use]
    pub fn reference_deck(&self) -> &[Card] {
        &self.reference
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn set_current_player(&mut self, seat: SeatId) {
        self.current = seat;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_stack_count(&mut self, stack_count: u32) {
        self.stack_count = stack_count;
    }

    /// Move the turn one seat along the current direction.
    pub fn advance(&mut self) {
        self.current = self.current.step(self.direction, self.player_count());
    }

    /// Flip the direction of play, returning the new one.
    pub fn reverse(&mut self) -> Direction {
        self.direction = self.direction.reversed();
        self.direction
    }

    /// Shuffle the draw pile and deal a fresh game starting at `first`.
    ///
    /// Expects every card to be in the draw pile (a new or swept table).
    pub fn deal(&mut self, rng: &mut GameRng, first: SeatId) -> Result<Card> {
        self.draw.shuffle(rng);
        for _ in 0..self.rules.initial_hand {
            for seat in SeatId::all(self.player_count()) {
                if self.draw_to(seat).is_none() {
                    return Err(SimError::InvalidState("draw pile ran out while dealing".into()));
                }
            }
        }
        let top = self
            .draw
            .remove_top()
            .ok_or_else(|| SimError::InvalidState("no card left to flip after dealing".into()))?;
        self.top = Some(top);
        self.direction = Direction::Forward;
        self.stack_count = 0;
        self.current = first;
        Ok(top)
    }

    /// Move the top of the draw pile into a hand.
    pub fn draw_to(&mut self, seat: SeatId) -> Option<Card> {
        let card = self.draw.remove_top()?;
        self.hands[seat].add(card);
        self.hand_sizes[seat] += 1;
        Some(card)
    }

    /// Draw up to `count` cards, stopping early if the draw pile runs out.
    /// Returns how many were drawn.
    pub fn draw_many(&mut self, seat: SeatId, count: usize) -> usize {
        (0..count).take_while(|_| self.draw_to(seat).is_some()).count()
    }

    /// Take `card` out of a hand and make it the new top card.
    ///
    /// The previous top card goes to the discard pile.
    pub fn place_on_top(&mut self, seat: SeatId, card: Card) -> Result<()> {
        let card = self.hands[seat].remove(&card)?;
        self.hand_sizes[seat] -= 1;
        if let Some(previous) = self.top.replace(card) {
            self.discard.add(previous);
        }
        Ok(())
    }

    /// Take `card` out of a hand without putting it anywhere.
    pub(crate) fn take_from_hand(&mut self, seat: SeatId, card: Card) -> Result<Card> {
        let card = self.hands[seat].remove(&card)?;
        self.hand_sizes[seat] -= 1;
        Ok(card)
    }

    /// Shuffle the discard pile (plus whatever the draw pile still holds)
    /// into a new draw pile. The top card stays face-up.
    pub(crate) fn recycle_discard(&mut self, rng: &mut GameRng) {
        self.discard.drain_into(&mut self.draw);
        self.draw.shuffle(rng);
    }

    pub(crate) fn discard_mut(&mut self) -> &mut Pile {
        &mut self.discard
    }

    /// Gather every card back into the draw pile and reset the turn state.
    pub fn sweep(&mut self) {
        for (_, hand) in self.hands.iter_mut() {
            hand.drain_into(&mut self.draw);
        }
        for (_, size) in self.hand_sizes.iter_mut() {
            *size = 0;
        }
        self.discard.drain_into(&mut self.draw);
        if let Some(top) = self.top.take() {
            self.draw.add(top);
        }
        self.direction = Direction::Forward;
        self.stack_count = 0;
        self.current = SeatId::new(0);
    }

    /// Total cards on the table, wherever they are.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.draw.len()
            + self.discard.len()
            + self.hands.values().map(Pile::len).sum::<usize>()
            + usize::from(self.top.is_some())
    }

    /// Value counts of every card on the table.
    #[must_use]
    pub fn multiset(&self) -> FxHashMap<Card, usize> {
        let mut counts = self.draw.multiset();
        let piles = std::iter::once(&self.discard).chain(self.hands.values());
        for card in piles.flat_map(Pile::iter).chain(self.top.iter()) {
            *counts.entry(*card).or_insert(0) += 1;
        }
        counts
    }

    /// Fail if cards were created or lost.
    pub fn check_integrity(&self, step: u64) -> Result<()> {
        let found = self.card_count();
        let expected = self.reference.len();
        if found == expected {
            Ok(())
        } else {
            Err(SimError::PileIntegrity { step, expected, found })
        }
    }

    /// Public decision context, or `None` before the first deal.
    #[must_use]
    pub fn turn_info(&self) -> Option<TurnInfo> {
        Some(TurnInfo {
            top_card: self.top?,
            current_player: self.current,
            direction: self.direction,
            stack_count: self.stack_count,
        })
    }

    /// What `seat` is allowed to see.
    #[must_use]
    pub fn view(&self, seat: SeatId) -> SeatView<'_> {
        SeatView::new(seat, &self.hands[seat], &self.discard, &self.reference, &self.hand_sizes)
            .with_rules(&self.rules)
    }
}
