//! Error types.
//!
//! Illegal plays and illegal jumps are *not* errors: the engine recovers from
//! them with a penalty draw. Everything here either rejects a configuration
//! up front or ends the current game.

use thiserror::Error;

use super::card::Card;

/// Errors raised by the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// A card was removed from a pile that does not hold it.
    #[error("card {card} not found in pile")]
    CardNotFound { card: Card },

    /// Cards were created or destroyed during a game.
    #[error("pile integrity violated at step {step}: counted {found} cards, expected {expected}")]
    PileIntegrity {
        step: u64,
        expected: usize,
        found: usize,
    },

    /// A run was requested with a single seat.
    #[error("a game needs at least two players, got one")]
    SingleSeat,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),

    /// Persisted statistics do not fit the requested run.
    #[error("invalid saved state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Does this error end the game it happened in?
    #[must_use]
    pub fn is_fatal_to_game(&self) -> bool {
        matches!(self, SimError::CardNotFound { .. } | SimError::PileIntegrity { .. })
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
