//! # mao-sim
//!
//! A simulation engine for benchmarking Mao strategies.
//!
//! Mao here is a shedding game in the Uno family: match the top card by rank
//! or suit, empty your hand to win. Two twists make it interesting to
//! simulate:
//!
//! - **Jump-ins**: after every turn, any seat holding a card identical to the
//!   top card may play it out of turn and take the turn.
//! - **Pauses**: when the draw pile runs out, every hand is capped and the
//!   discard pile is shuffled back in.
//!
//! ## Design Principles
//!
//! 1. **Strategies see only what a player sees.** Each decision gets a fresh
//!    `SeatView`: own hand, discard pile, public hand sizes.
//!
//! 2. **Cards are conserved.** Every card lives in exactly one place; the
//!    table can verify this after every step.
//!
//! 3. **Deterministic when seeded.** All randomness flows through `GameRng`.
//!
//! ## Modules
//!
//! - `core`: cards, piles, seats, RNG, configuration, errors
//! - `strategy`: the `Strategy` trait, built-in strategies and the registry
//! - `engine`: table state, the turn loop, the pause protocol, events
//! - `run`: back-to-back games, statistics, persistence, reporting
//! - `tournament`: every strategy combination, in parallel

pub mod core;
pub mod engine;
pub mod run;
pub mod strategy;
pub mod tournament;

#[cfg(feature = "cli")]
pub mod logging;

pub use crate::core::{
    Card, DeckBuilder, Direction, GameRng, Pile, Result, RuleSet, RunConfig, SeatId, SeatMap,
    SimError, Suit,
};

pub use crate::engine::{GameEvent, GameObserver, GameOutcome, GameRecord, Table, TurnEngine};

pub use crate::run::{RunController, RunReport, RunStats, StatsStore, StopHandle};

pub use crate::strategy::{PlayDecision, SeatView, Strategy, TurnInfo};

pub use crate::tournament::{run_tournament, TournamentConfig, TournamentReport};
