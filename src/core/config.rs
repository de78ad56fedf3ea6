//! Rule and run configuration.
//!
//! - `RuleSet`: table rules (hand size, pause ceiling, special ranks)
//! - `RunConfig`: everything a run needs besides the strategies themselves
//!
//! Both follow the builder style: start from `Default`, adjust with `with_*`.

use serde::{Deserialize, Serialize};

use super::card::{reference_deck, standard_deck, DeckBuilder};
use super::error::{Result, SimError};

/// Table rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Cards dealt to each seat at the start of a game.
    pub initial_hand: usize,

    /// During a pause, seats holding more than this surrender cards.
    pub hand_ceiling: usize,

    /// Playing this rank flips the direction of play.
    pub reverse_rank: u8,

    /// Playing this rank grows the stack counter and makes the player draw it.
    pub stacking_rank: u8,
}

impl RuleSet {
    /// Standard table rules: deal 3, cap 5, tens reverse, sevens stack.
    pub const STANDARD: RuleSet = RuleSet {
        initial_hand: 3,
        hand_ceiling: 5,
        reverse_rank: 10,
        stacking_rank: 7,
    };
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Configuration for one run of back-to-back games.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Number of seats at the table.
    pub player_count: usize,

    /// Cap on decision steps across the whole run.
    pub iteration_budget: u64,

    /// Number of physical decks shuffled together.
    pub num_decks: usize,

    /// Builds the full card multiset.
    pub deck_builder: DeckBuilder,

    /// Log illegal plays and jumps at debug instead of error level.
    pub tolerate_illegal: bool,

    /// Pick the first player of each game uniformly at random.
    pub random_first_player: bool,

    /// Reshuffle which strategy sits in which seat after every game.
    pub shuffle_seats: bool,

    /// RNG seed. `None` draws one from system entropy.
    pub seed: Option<u64>,

    /// Count every card after every decision step.
    pub verify_integrity: bool,

    pub rules: RuleSet,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            player_count: 4,
            iteration_budget: 1_000_000,
            num_decks: 1,
            deck_builder: standard_deck,
            tolerate_illegal: false,
            random_first_player: false,
            shuffle_seats: false,
            seed: None,
            verify_integrity: cfg!(debug_assertions),
            rules: RuleSet::default(),
        }
    }
}

impl RunConfig {
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    pub fn with_iteration_budget(mut self, budget: u64) -> Self {
        self.iteration_budget = budget;
        self
    }

    pub fn with_decks(mut self, num_decks: usize) -> Self {
        self.num_decks = num_decks;
        self
    }

    pub fn with_deck_builder(mut self, builder: DeckBuilder) -> Self {
        self.deck_builder = builder;
        self
    }

    pub fn with_tolerate_illegal(mut self, tolerate: bool) -> Self {
        self.tolerate_illegal = tolerate;
        self
    }

    pub fn with_random_first_player(mut self, enabled: bool) -> Self {
        self.random_first_player = enabled;
        self
    }

    pub fn with_shuffle_seats(mut self, enabled: bool) -> Self {
        self.shuffle_seats = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verify_integrity(mut self, enabled: bool) -> Self {
        self.verify_integrity = enabled;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Total number of cards the deck builder produces.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        reference_deck(self.deck_builder, self.num_decks).len()
    }

    /// Reject configurations that cannot produce a playable game.
    ///
    /// A one-seat table is reported as `SingleSeat`. The deck must cover the
    /// deal plus a top card, and must be large enough that a pause always
    /// leaves at least one card to draw once every hand is capped.
    pub fn validate(&self) -> Result<()> {
        match self.player_count {
            0 => return Err(SimError::InvalidConfig("player count must be positive".into())),
            1 => return Err(SimError::SingleSeat),
            n if n > 255 => {
                return Err(SimError::InvalidConfig(format!("at most 255 players supported, got {n}")))
            }
            _ => {}
        }
        if self.num_decks == 0 {
            return Err(SimError::InvalidConfig("deck count must be positive".into()));
        }
        if self.rules.hand_ceiling == 0 {
            return Err(SimError::InvalidConfig("hand ceiling must be positive".into()));
        }

        let total = self.total_cards();
        let deal = self.rules.initial_hand * self.player_count + 1;
        if total < deal {
            return Err(SimError::InvalidConfig(format!(
                "{total} cards cannot deal {} to each of {} players",
                self.rules.initial_hand, self.player_count
            )));
        }
        let refill = self.rules.hand_ceiling * self.player_count + 2;
        if total < refill {
            return Err(SimError::InvalidConfig(format!(
                "{total} cards leave nothing to draw after a pause with {} players; use more decks",
                self.player_count
            )));
        }
        Ok(())
    }
}
