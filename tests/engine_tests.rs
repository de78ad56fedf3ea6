//! Table-wide invariants checked after every event of many full games.

use mao_sim::core::{reference_deck, standard_deck, Card, GameRng, RunConfig};
use mao_sim::engine::{GameEvent, GameObserver, Table};
use mao_sim::run::RunController;
use mao_sim::strategy::{lineup, registered};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

/// Asserts conservation, legality, the win condition and the pause cap as
/// the games unfold.
struct Checker {
    expected: FxHashMap<Card, usize>,
    top: Option<Card>,
    events: usize,
    plays: usize,
    jumps: usize,
    pauses: usize,
    wins: usize,
}

impl Checker {
    fn new(num_decks: usize) -> Self {
        let mut expected = FxHashMap::default();
        for card in reference_deck(standard_deck, num_decks) {
            *expected.entry(card).or_insert(0) += 1;
        }
        Self { expected, top: None, events: 0, plays: 0, jumps: 0, pauses: 0, wins: 0 }
    }
}

impl GameObserver for Checker {
    fn on_event(&mut self, event: &GameEvent, table: &Table) {
        self.events += 1;
        assert_eq!(table.multiset(), self.expected, "cards changed after {event:?}");
        for (seat, size) in table.hand_sizes().iter() {
            assert_eq!(*size, table.hand(seat).len(), "stale hand size for {seat}");
        }

        match event {
            GameEvent::Dealt { top, .. } => {
                self.top = Some(*top);
            }
            GameEvent::Played { card, .. } => {
                let previous = self.top.expect("play before deal");
                assert!(card.matches_for_play(&previous), "{card} played on {previous}");
                self.top = Some(*card);
                self.plays += 1;
            }
            GameEvent::Jumped { card, .. } => {
                let previous = self.top.expect("jump before deal");
                assert!(card.matches_for_jump(&previous), "{card} jumped on {previous}");
                self.top = Some(*card);
                self.jumps += 1;
            }
            GameEvent::Paused { .. } => {
                let ceiling = table.rules().hand_ceiling;
                for (seat, hand) in table.hand_sizes().iter() {
                    assert!(*hand <= ceiling, "{seat} holds {hand} after a pause");
                }
                assert!(!table.draw_pile().is_empty());
                self.pauses += 1;
            }
            GameEvent::Won { seat } => {
                assert!(table.hand(*seat).is_empty(), "{seat} won with cards left");
                self.wins += 1;
            }
            _ => {}
        }
        assert_eq!(table.top_card(), self.top);
    }
}

fn mixed_lineup(players: usize, offset: usize) -> Vec<String> {
    let names = registered();
    (0..players).map(|i| names[(i + offset) % names.len()].name.to_string()).collect()
}

fn checked_run(seed: u64, players: usize, decks: usize, budget: u64) -> Checker {
    let config = RunConfig::new(players)
        .with_decks(decks)
        .with_iteration_budget(budget)
        .with_seed(seed)
        .with_tolerate_illegal(true)
        .with_random_first_player(true)
        .with_shuffle_seats(true)
        .with_verify_integrity(true);
    let mut rng = GameRng::new(seed);
    let strategies = lineup(&mixed_lineup(players, seed as usize), &mut rng).unwrap();
    let mut controller = RunController::new(config, strategies).unwrap();
    let mut checker = Checker::new(decks);

    let report = controller.run_observed(&mut checker).unwrap();

    assert!(report.is_ok(), "run failed: {:?}", report.error);
    assert_eq!(checker.wins as u64, report.games_completed);
    checker
}

// =============================================================================
// Conservation and Legality
// =============================================================================

#[test]
fn test_invariants_two_to_eight_players() {
    for players in 2..=8 {
        let checker = checked_run(players as u64, players, 1, 3_000);
        assert!(checker.events > 0);
        assert!(checker.plays > 0);
    }
}

#[test]
fn test_invariants_with_multiple_decks() {
    for decks in 1..=3 {
        let checker = checked_run(100 + decks as u64, 4, decks, 5_000);
        assert!(checker.wins > 0);
    }
}

#[test]
fn test_jumps_happen_with_duplicate_cards() {
    // Two decks put identical cards in play, so jump-ins must occur
    let checker = checked_run(77, 4, 2, 20_000);
    assert!(checker.jumps > 0);
}

#[test]
fn test_pauses_cap_hands() {
    let checker = checked_run(5, 6, 1, 10_000);
    assert!(checker.pauses > 0);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let config = RunConfig::new(3).with_iteration_budget(4_000).with_seed(seed);
        let mut rng = GameRng::new(seed);
        let strategies = lineup(&["random", "counting", "follow_up"], &mut rng).unwrap();
        let mut controller = RunController::new(config, strategies).unwrap();
        let mut log = mao_sim::engine::EventLog::new();
        controller.run_observed(&mut log).unwrap();
        (log.events().to_vec(), controller.into_stats())
    };

    let (events_a, stats_a) = run(31);
    let (events_b, stats_b) = run(31);

    assert_eq!(events_a, events_b);
    assert_eq!(stats_a, stats_b);
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_cards_are_conserved(seed in any::<u64>(), players in 2usize..=6, decks in 1usize..=3) {
        let checker = checked_run(seed, players, decks, 1_500);
        prop_assert!(checker.events > 0);
    }
}
