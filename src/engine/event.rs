//! Game events and observers.
//!
//! The engine reports everything that happens at the table as a `GameEvent`
//! and hands it to a `GameObserver` together with read access to the table
//! right after the event took effect. Observers cannot change the game;
//! they are for tracing, statistics and test assertions.

use serde::{Deserialize, Serialize};

use crate::core::{Card, Direction, SeatId};

use super::table::Table;

/// Something that happened during a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Hands were dealt and the first top card flipped.
    Dealt { first: SeatId, top: Card },

    /// A legal regular-turn play.
    Played { seat: SeatId, card: Card },

    /// Cards moved from the draw pile to a hand. `count` may fall short of
    /// what was owed when the draw pile ran out.
    Drew { seat: SeatId, count: usize },

    /// A regular-turn card that does not match the top card.
    IllegalPlay { seat: SeatId, card: Card },

    /// A jump-in card that is not identical to the top card.
    IllegalJump { seat: SeatId, card: Card },

    /// A successful out-of-turn jump.
    Jumped { seat: SeatId, card: Card },

    /// Direction of play flipped; carries the new direction.
    Reversed { direction: Direction },

    /// The draw pile ran out and the pause protocol ran.
    Paused { hand_sizes: Vec<usize> },

    Won { seat: SeatId },

    /// One decision step (turn plus jump-in scan) finished.
    StepCompleted { step: u64 },
}

/// Receives every event of a game.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent, table: &Table);
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {
    #[inline]
    fn on_event(&mut self, _event: &GameEvent, _table: &Table) {}
}

/// Observer that records every event in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of recorded events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &GameEvent, _table: &Table) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{reference_deck, standard_deck, RuleSet, Suit};

    #[test]
    fn test_event_log_records_in_order() {
        let table = Table::new(2, reference_deck(standard_deck, 1), RuleSet::default());
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.on_event(&GameEvent::Won { seat: SeatId::new(1) }, &table);
        log.on_event(&GameEvent::StepCompleted { step: 3 }, &table);

        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0], GameEvent::Won { seat: SeatId::new(1) });
        assert_eq!(log.count(|e| matches!(e, GameEvent::StepCompleted { .. })), 1);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::Played {
            seat: SeatId::new(2),
            card: Card::new(10, Suit::Spades),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
