//! Core table types: cards, piles, seats, RNG, configuration, errors.
//!
//! Nothing here knows about turns or strategies. The engine and the
//! strategies are both built on top of these values.

pub mod card;
pub mod pile;
pub mod seat;
pub mod rng;
pub mod config;
pub mod error;

pub use card::{reference_deck, standard_deck, Card, DeckBuilder, Suit, STANDARD_RANKS};
pub use pile::{HoldingPile, Pile};
pub use seat::{Direction, SeatId, SeatMap};
pub use rng::GameRng;
pub use config::{RuleSet, RunConfig};
pub use error::{Result, SimError};
