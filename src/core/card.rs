//! Card values and deck construction.
//!
//! A `Card` is a plain `(rank, suit)` value. Two cards with the same rank and
//! suit are interchangeable, which is what makes multi-deck games work: a
//! second copy of the seven of hearts is the *same* card for every rule and
//! every pile operation.
//!
//! ## Matching
//!
//! - `matches_for_play`: same rank **or** same suit (regular turn play)
//! - `matches_for_jump`: same rank **and** same suit (out-of-turn jump-in)

use serde::{Deserialize, Serialize};

use super::pile::Pile;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits, in deck-building order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Lowercase suit name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable card value.
///
/// Equality and hashing are structural, so duplicates coming from several
/// physical decks compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    /// Rank (1..=13 in a standard deck).
    pub rank: u8,
    /// Suit.
    pub suit: Suit,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub const fn new(rank: u8, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Can this card be played on top of `top` during a regular turn?
    #[must_use]
    pub fn matches_for_play(&self, top: &Card) -> bool {
        self.rank == top.rank || self.suit == top.suit
    }

    /// Can this card jump in on top of `top` out of turn?
    #[must_use]
    pub fn matches_for_jump(&self, top: &Card) -> bool {
        self == top
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

/// Deck-construction callback: appends `num_decks` full decks to the pile.
pub type DeckBuilder = fn(&mut Pile, usize);

/// Number of ranks in a standard deck.
pub const STANDARD_RANKS: u8 = 13;

/// Build `num_decks` standard 52-card decks (ranks 1..=13, four suits).
pub fn standard_deck(pile: &mut Pile, num_decks: usize) {
    for _ in 0..num_decks {
        for rank in 1..=STANDARD_RANKS {
            for suit in Suit::ALL {
                pile.add(Card::new(rank, suit));
            }
        }
    }
}

/// Materialize the full reference multiset produced by a deck builder.
#[must_use]
pub fn reference_deck(builder: DeckBuilder, num_decks: usize) -> Vec<Card> {
    let mut pile = Pile::new();
    builder(&mut pile, num_decks);
    pile.into_cards()
}
