//! Ordered card collections.
//!
//! A `Pile` serves as draw pile, discard pile and hand alike. The top of a
//! pile is the end of its vector, so drawing is a `pop`.
//!
//! `HoldingPile` is the transient container used while a pause is in
//! progress. Cards surrendered there cannot be looked at; they can only be
//! released into another pile once the pause is complete.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::error::{Result, SimError};
use super::rng::GameRng;

/// An ordered, mutable sequence of cards (top = end of vec).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    /// Create an empty pile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pile from cards (last card is the top).
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Put a card on top of the pile.
    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove the first card equal to `card`.
    ///
    /// Duplicates are removed by value, first match wins.
    pub fn remove(&mut self, card: &Card) -> Result<Card> {
        let pos = self
            .cards
            .iter()
            .position(|c| c == card)
            .ok_or(SimError::CardNotFound { card: *card })?;
        Ok(self.cards.remove(pos))
    }

    /// Remove and return the top card, or `None` if empty.
    pub fn remove_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Peek at the top card.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// Iterate bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Move every card onto `other`, preserving order, leaving this pile empty.
    pub fn drain_into(&mut self, other: &mut Pile) {
        other.cards.append(&mut self.cards);
    }

    /// Value counts of the cards in this pile.
    #[must_use]
    pub fn multiset(&self) -> FxHashMap<Card, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(*card).or_insert(0) += 1;
        }
        counts
    }

    /// Consume the pile, returning its cards.
    #[must_use]
    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

impl<'a> IntoIterator for &'a Pile {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl std::fmt::Display for Pile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", card)?;
        }
        f.write_str("]")
    }
}

/// Face-down container for cards surrendered during a pause.
///
/// Only exposes a count; contents become visible again only after
/// `release_into` hands them to a regular pile.
#[derive(Debug, Default)]
pub struct HoldingPile {
    cards: Vec<Card>,
}

impl HoldingPile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a surrendered card face-down.
    pub fn stash(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Empty the holding pile onto `pile`.
    pub fn release_into(self, pile: &mut Pile) {
        pile.cards.extend(self.cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Suit;

    fn c(rank: u8, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn test_add_and_remove_top() {
        let mut pile = Pile::new();
        pile.add(c(1, Suit::Hearts));
        pile.add(c(2, Suit::Hearts));

        assert_eq!(pile.len(), 2);
        assert_eq!(pile.top(), Some(&c(2, Suit::Hearts)));
        assert_eq!(pile.remove_top(), Some(c(2, Suit::Hearts)));
        assert_eq!(pile.remove_top(), Some(c(1, Suit::Hearts)));
        assert_eq!(pile.remove_top(), None);
        assert!(pile.is_empty());
    }

    #[test]
    fn test_remove_first_match() {
        let mut pile = Pile::from_cards(vec![
            c(3, Suit::Clubs),
            c(5, Suit::Spades),
            c(3, Suit::Clubs),
            c(9, Suit::Hearts),
        ]);

        assert_eq!(pile.remove(&c(3, Suit::Clubs)).unwrap(), c(3, Suit::Clubs));
        assert_eq!(
            pile.as_slice(),
            &[c(5, Suit::Spades), c(3, Suit::Clubs), c(9, Suit::Hearts)]
        );
    }

    #[test]
    fn test_remove_missing_card() {
        let mut pile = Pile::from_cards(vec![c(3, Suit::Clubs)]);
        let err = pile.remove(&c(4, Suit::Clubs)).unwrap_err();
        assert!(matches!(err, SimError::CardNotFound { card } if card == c(4, Suit::Clubs)));
        assert_eq!(pile.len(), 1);
    }

    #[test]
    fn test_shuffle_preserves_multiset() {
        let mut rng = GameRng::new(7);
        let mut pile = Pile::new();
        crate::core::card::standard_deck(&mut pile, 1);
        let before = pile.multiset();
        let order = pile.as_slice().to_vec();

        pile.shuffle(&mut rng);

        assert_eq!(pile.multiset(), before);
        assert_ne!(pile.as_slice(), order.as_slice());
    }

    #[test]
    fn test_drain_into() {
        let mut a = Pile::from_cards(vec![c(1, Suit::Hearts), c(2, Suit::Hearts)]);
        let mut b = Pile::from_cards(vec![c(13, Suit::Spades)]);

        a.drain_into(&mut b);

        assert!(a.is_empty());
        assert_eq!(b.len(), 3);
        assert_eq!(b.top(), Some(&c(2, Suit::Hearts)));
    }

    #[test]
    fn test_multiset_counts_duplicates() {
        let pile = Pile::from_cards(vec![c(7, Suit::Hearts), c(7, Suit::Hearts), c(1, Suit::Clubs)]);
        let counts = pile.multiset();
        assert_eq!(counts[&c(7, Suit::Hearts)], 2);
        assert_eq!(counts[&c(1, Suit::Clubs)], 1);
    }

    #[test]
    fn test_holding_pile_release() {
        let mut holding = HoldingPile::new();
        holding.stash(c(4, Suit::Diamonds));
        holding.stash(c(6, Suit::Diamonds));
        assert_eq!(holding.len(), 2);

        let mut discard = Pile::from_cards(vec![c(1, Suit::Spades)]);
        holding.release_into(&mut discard);

        assert_eq!(discard.len(), 3);
        assert!(discard.contains(&c(6, Suit::Diamonds)));
    }

    #[test]
    fn test_display() {
        let pile = Pile::from_cards(vec![c(1, Suit::Hearts), c(2, Suit::Clubs)]);
        assert_eq!(pile.to_string(), "[1 of hearts, 2 of clubs]");
    }
}
