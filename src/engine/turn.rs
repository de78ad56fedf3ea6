//! The turn engine: plays one game to completion or until the step budget
//! runs out.
//!
//! ## Decision step
//!
//! 1. The current seat is asked for a play.
//!    - Illegal card: penalty draw, and the same seat decides again next
//!      step. No jump-in scan follows.
//!    - Legal card: it becomes the top card, then rank effects apply
//!      (reverse flips direction, stacking grows the stack and makes the
//!      player draw its size, anything else clears the stack).
//!    - Draw or pass: one card is drawn.
//! 2. Empty hand wins. A stacking card played last refills the hand first,
//!    so it never wins.
//! 3. The turn advances; an empty draw pile triggers a pause.
//! 4. Jump-in scan: every seat, in a fresh random order, may jump with a
//!    card identical to the top card. The first valid jump takes the turn
//!    and ends the scan. Jumps apply no rank effects.

use log::{debug, error};
use smallvec::SmallVec;

use crate::core::{Card, GameRng, Result, SeatId, SimError};
use crate::run::RunStats;
use crate::strategy::{PlayDecision, Strategy, TurnInfo};

use super::event::{GameEvent, GameObserver};
use super::pause::run_pause;
use super::record::{GameOutcome, GameRecord};
use super::table::Table;

/// Seat visiting order for one jump-in scan.
type ScanOrder = SmallVec<[SeatId; 8]>;

/// Drives a single game on a table.
pub struct TurnEngine<'a> {
    table: &'a mut Table,
    seats: &'a mut [Box<dyn Strategy>],
    rng: &'a mut GameRng,
    stats: &'a mut RunStats,
    tolerate_illegal: bool,
    verify_integrity: bool,
}

impl<'a> TurnEngine<'a> {
    /// `seats[i]` plays seat `i`.
    pub fn new(
        table: &'a mut Table,
        seats: &'a mut [Box<dyn Strategy>],
        rng: &'a mut GameRng,
        stats: &'a mut RunStats,
    ) -> Self {
        Self {
            table,
            seats,
            rng,
            stats,
            tolerate_illegal: false,
            verify_integrity: false,
        }
    }

    /// Log illegal plays and jumps at debug instead of error level.
    #[must_use]
    pub fn with_tolerate_illegal(mut self, tolerate: bool) -> Self {
        self.tolerate_illegal = tolerate;
        self
    }

    /// Count every card before each decision step.
    #[must_use]
    pub fn with_verify_integrity(mut self, verify: bool) -> Self {
        self.verify_integrity = verify;
        self
    }

    /// Deal and play one game, taking at most `budget` decision steps.
    ///
    /// Illegal plays and jumps are recovered from. A missing card or a
    /// failed integrity check ends the game with an error.
    pub fn play_game<O>(
        &mut self,
        first: SeatId,
        budget: u64,
        observer: &mut O,
    ) -> Result<GameRecord>
    where
        O: GameObserver + ?Sized,
    {
        if self.seats.len() != self.table.player_count() {
            return Err(SimError::InvalidConfig(format!(
                "{} strategies for {} seats",
                self.seats.len(),
                self.table.player_count()
            )));
        }

        let top = self.table.deal(self.rng, first)?;
        let mut record = GameRecord::new(self.table.player_count(), top);
        debug!("Dealt, top card {top}, {first} starts");
        observer.on_event(&GameEvent::Dealt { first, top }, self.table);

        while record.steps < budget {
            record.steps += 1;
            if self.verify_integrity {
                self.table.check_integrity(record.steps)?;
            }

            let winner = self.step(&mut record, observer)?;
            if let Some(seat) = winner {
                record.outcome = GameOutcome::Won(seat);
                let name = self.seats[seat.index()].name();
                debug!("{seat} ({name}) wins after {} steps", record.steps);
                observer.on_event(&GameEvent::Won { seat }, self.table);
            }
            observer.on_event(&GameEvent::StepCompleted { step: record.steps }, self.table);
            if winner.is_some() {
                return Ok(record);
            }
        }

        debug!("Game truncated after {} steps", record.steps);
        Ok(record)
    }

    fn turn_info(&self) -> Result<TurnInfo> {
        self.table
            .turn_info()
            .ok_or_else(|| SimError::InvalidState("no top card on the table".into()))
    }

    /// One decision step. Returns the winner, if any.
    fn step<O>(&mut self, record: &mut GameRecord, observer: &mut O) -> Result<Option<SeatId>>
    where
        O: GameObserver + ?Sized,
    {
        let seat = self.table.current_player();
        let turn = self.turn_info()?;
        let hand_size = self.table.hand(seat).len();
        self.stats.record_decision(hand_size);

        let decision = self.seats[seat.index()].pick_play_card(&self.table.view(seat), &turn);
        match decision {
            PlayDecision::Play(card) if !card.matches_for_play(&turn.top_card) => {
                record.illegal_plays[seat] += 1;
                self.report_illegal("play", seat, card, turn.top_card);
                observer.on_event(&GameEvent::IllegalPlay { seat, card }, self.table);
                self.draw_one(seat, observer);
                self.pause_if_exhausted(record, observer)?;
                return Ok(None);
            }
            PlayDecision::Play(card) => {
                self.stats.record_legal(hand_size);
                self.table.place_on_top(seat, card)?;
                record.top_cards.push(card);
                debug!("{seat} plays {card}");
                observer.on_event(&GameEvent::Played { seat, card }, self.table);
                self.apply_rank_effects(seat, card, observer);
            }
            PlayDecision::Pass => {
                self.stats.record_legal(hand_size);
                self.draw_one(seat, observer);
            }
            PlayDecision::Draw => {
                self.draw_one(seat, observer);
            }
        }

        if self.table.hand(seat).is_empty() {
            return Ok(Some(seat));
        }

        self.table.advance();
        self.pause_if_exhausted(record, observer)?;
        self.jump_in_scan(record, observer)
    }

    fn apply_rank_effects<O>(&mut self, seat: SeatId, card: Card, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        let rules = self.table.rules();
        let (reverse_rank, stacking_rank) = (rules.reverse_rank, rules.stacking_rank);

        if card.rank == reverse_rank {
            let direction = self.table.reverse();
            observer.on_event(&GameEvent::Reversed { direction }, self.table);
        }

        if card.rank == stacking_rank {
            let stack = self.table.stack_count() + 1;
            self.table.set_stack_count(stack);
            let count = self.table.draw_many(seat, stack as usize);
            debug!("{seat} stacks to {stack} and draws {count}");
            observer.on_event(&GameEvent::Drew { seat, count }, self.table);
        } else {
            self.table.set_stack_count(0);
        }
    }

    fn jump_in_scan<O>(
        &mut self,
        record: &mut GameRecord,
        observer: &mut O,
    ) -> Result<Option<SeatId>>
    where
        O: GameObserver + ?Sized,
    {
        let mut order: ScanOrder = SeatId::all(self.table.player_count()).collect();
        self.rng.shuffle(order.as_mut_slice());

        for seat in order {
            let turn = self.turn_info()?;
            let Some(card) = self.seats[seat.index()].pick_jump_card(&self.table.view(seat), &turn)
            else {
                continue;
            };

            if !card.matches_for_jump(&turn.top_card) {
                record.illegal_jumps[seat] += 1;
                self.report_illegal("jump", seat, card, turn.top_card);
                observer.on_event(&GameEvent::IllegalJump { seat, card }, self.table);
                self.draw_one(seat, observer);
                self.pause_if_exhausted(record, observer)?;
                continue;
            }

            let hand_size = self.table.hand(seat).len();
            self.table.place_on_top(seat, card)?;
            self.stats.record_jump(hand_size);
            record.jumps[seat] += 1;
            record.top_cards.push(card);
            self.table.set_current_player(seat);
            debug!("{seat} jumps in with {card}");
            observer.on_event(&GameEvent::Jumped { seat, card }, self.table);

            if self.table.hand(seat).is_empty() {
                return Ok(Some(seat));
            }
            break;
        }
        Ok(None)
    }

    fn draw_one<O>(&mut self, seat: SeatId, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        let count = usize::from(self.table.draw_to(seat).is_some());
        observer.on_event(&GameEvent::Drew { seat, count }, self.table);
    }

    fn pause_if_exhausted<O>(&mut self, record: &mut GameRecord, observer: &mut O) -> Result<()>
    where
        O: GameObserver + ?Sized,
    {
        if !self.table.draw_pile().is_empty() {
            return Ok(());
        }
        let hand_sizes = run_pause(self.table, self.seats, self.rng)?;
        record.pauses += 1;
        self.stats.record_pause(hand_sizes.clone());
        observer.on_event(&GameEvent::Paused { hand_sizes }, self.table);
        Ok(())
    }

    fn report_illegal(&self, kind: &str, seat: SeatId, card: Card, top: Card) {
        let name = self.seats[seat.index()].name();
        if self.tolerate_illegal {
            debug!("{seat} ({name}) tried illegal {kind} {card} on {top}");
        } else {
            error!("{seat} ({name}) tried illegal {kind} {card} on {top}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Direction, RuleSet, Suit};
    use crate::engine::EventLog;
    use crate::run::stats::JUMPS;
    use crate::strategy::{FirstStrategy, SeatView};

    fn c(rank: u8, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    /// Plays a fixed script of decisions, then draws forever. Never jumps.
    struct Scripted {
        plays: Vec<PlayDecision>,
    }

    impl Scripted {
        fn boxed(plays: Vec<PlayDecision>) -> Box<dyn Strategy> {
            let mut plays = plays;
            plays.reverse();
            Box::new(Self { plays })
        }
    }

    impl Strategy for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn pick_jump_card(&mut self, _view: &SeatView<'_>, _turn: &TurnInfo) -> Option<Card> {
            None
        }

        fn pick_play_card(&mut self, _view: &SeatView<'_>, _turn: &TurnInfo) -> PlayDecision {
            self.plays.pop().unwrap_or(PlayDecision::Draw)
        }

        fn discard_card(&mut self, view: &SeatView<'_>, _turn: &TurnInfo) -> Card {
            view.hand().as_slice()[0]
        }
    }

    /// Runs `steps` decisions on an arranged table without re-dealing.
    fn run_steps(
        table: &mut Table,
        seats: &mut [Box<dyn Strategy>],
        steps: u64,
    ) -> (GameRecord, RunStats, EventLog) {
        let mut rng = GameRng::new(1);
        let mut stats = RunStats::new(seats.len());
        let mut log = EventLog::new();
        let top = table.top_card().unwrap();
        let mut record = GameRecord::new(table.player_count(), top);
        let mut engine = TurnEngine::new(table, seats, &mut rng, &mut stats);
        for _ in 0..steps {
            record.steps += 1;
            if let Some(seat) = engine.step(&mut record, &mut log).unwrap() {
                record.outcome = GameOutcome::Won(seat);
                break;
            }
        }
        (record, stats, log)
    }

    #[test]
    fn test_illegal_play_keeps_turn_and_draws() {
        let mut table = Table::arranged(
            vec![vec![c(2, Suit::Clubs)], vec![c(3, Suit::Clubs)]],
            c(9, Suit::Hearts),
            vec![c(4, Suit::Spades), c(5, Suit::Spades)],
            vec![],
            RuleSet::default(),
        );
        let mut seats = vec![
            Scripted::boxed(vec![PlayDecision::Play(c(2, Suit::Clubs))]),
            Scripted::boxed(vec![]),
        ];

        let (record, stats, log) = run_steps(&mut table, &mut seats, 1);

        assert_eq!(record.illegal_plays[SeatId::new(0)], 1);
        assert_eq!(table.current_player(), SeatId::new(0));
        assert_eq!(table.hand(SeatId::new(0)).len(), 2);
        assert_eq!(table.top_card(), Some(c(9, Suit::Hearts)));
        assert_eq!(stats.playability[&1], [0, 1, 0]);
        assert_eq!(log.count(|e| matches!(e, GameEvent::IllegalPlay { .. })), 1);
    }

    #[test]
    fn test_reverse_rank_flips_direction() {
        let mut table = Table::arranged(
            vec![
                vec![c(10, Suit::Hearts), c(1, Suit::Spades)],
                vec![c(2, Suit::Spades)],
                vec![c(3, Suit::Spades)],
            ],
            c(4, Suit::Hearts),
            vec![c(5, Suit::Diamonds), c(6, Suit::Diamonds)],
            vec![],
            RuleSet::default(),
        );
        let mut seats: Vec<Box<dyn Strategy>> =
            vec![Box::new(FirstStrategy), Box::new(FirstStrategy), Box::new(FirstStrategy)];

        let (record, _, log) = run_steps(&mut table, &mut seats, 1);

        assert_eq!(table.direction(), Direction::Backward);
        assert_eq!(table.current_player(), SeatId::new(2));
        assert_eq!(record.top_cards, vec![c(4, Suit::Hearts), c(10, Suit::Hearts)]);
        assert_eq!(log.count(|e| matches!(e, GameEvent::Reversed { .. })), 1);
    }

    #[test]
    fn test_stacking_rank_draws_stack_count() {
        let mut table = Table::arranged(
            vec![
                vec![c(7, Suit::Hearts), c(7, Suit::Clubs), c(1, Suit::Spades)],
                vec![c(2, Suit::Spades)],
            ],
            c(4, Suit::Hearts),
            (1..=10).map(|r| c(r, Suit::Diamonds)).collect(),
            vec![],
            RuleSet::default(),
        );
        let mut seats = vec![
            Scripted::boxed(vec![PlayDecision::Play(c(7, Suit::Hearts))]),
            Scripted::boxed(vec![PlayDecision::Draw]),
        ];
        table.set_stack_count(2);

        run_steps(&mut table, &mut seats, 1);

        assert_eq!(table.stack_count(), 3);
        // Two left after playing, plus three drawn
        assert_eq!(table.hand(SeatId::new(0)).len(), 5);
        assert_eq!(table.draw_pile().len(), 7);
    }

    #[test]
    fn test_other_rank_clears_stack() {
        let mut table = Table::arranged(
            vec![vec![c(7, Suit::Hearts), c(2, Suit::Hearts)], vec![c(2, Suit::Spades)]],
            c(7, Suit::Spades),
            (1..=6).map(|r| c(r, Suit::Diamonds)).collect(),
            vec![],
            RuleSet::default(),
        );
        let mut seats = vec![
            Scripted::boxed(vec![PlayDecision::Play(c(7, Suit::Hearts))]),
            Scripted::boxed(vec![]),
        ];
        table.set_stack_count(4);

        run_steps(&mut table, &mut seats, 1);
        assert_eq!(table.stack_count(), 5);

        let mut seats = vec![
            Scripted::boxed(vec![PlayDecision::Play(c(2, Suit::Hearts))]),
            Scripted::boxed(vec![]),
        ];
        table.set_current_player(SeatId::new(0));
        run_steps(&mut table, &mut seats, 1);
        assert_eq!(table.stack_count(), 0);
    }

    #[test]
    fn test_last_stacking_card_does_not_win() {
        let mut table = Table::arranged(
            vec![vec![c(7, Suit::Hearts)], vec![c(2, Suit::Spades)]],
            c(4, Suit::Hearts),
            (1..=5).map(|r| c(r, Suit::Diamonds)).collect(),
            vec![],
            RuleSet::default(),
        );
        let mut seats: Vec<Box<dyn Strategy>> =
            vec![Box::new(FirstStrategy), Box::new(FirstStrategy)];

        let (record, _, _) = run_steps(&mut table, &mut seats, 1);

        assert_eq!(record.outcome, GameOutcome::Truncated);
        assert_eq!(table.hand(SeatId::new(0)).len(), 1);
    }

    #[test]
    fn test_last_card_wins_without_jump_scan() {
        let mut table = Table::arranged(
            vec![vec![c(4, Suit::Spades)], vec![c(4, Suit::Spades), c(9, Suit::Clubs)]],
            c(4, Suit::Hearts),
            vec![c(1, Suit::Diamonds)],
            vec![],
            RuleSet::default(),
        );
        let mut seats: Vec<Box<dyn Strategy>> =
            vec![Box::new(FirstStrategy), Box::new(FirstStrategy)];

        let (record, _, log) = run_steps(&mut table, &mut seats, 1);

        assert_eq!(record.winner(), Some(SeatId::new(0)));
        assert_eq!(log.count(|e| matches!(e, GameEvent::Jumped { .. })), 0);
    }

    #[test]
    fn test_jump_takes_turn_without_rank_effects() {
        let ten = c(10, Suit::Clubs);
        let mut table = Table::arranged(
            vec![
                vec![ten, c(1, Suit::Hearts)],
                vec![c(2, Suit::Spades)],
                vec![ten, c(3, Suit::Hearts)],
            ],
            c(10, Suit::Diamonds),
            (1..=6).map(|r| c(r, Suit::Diamonds)).collect(),
            vec![],
            RuleSet::default(),
        );
        // Seat 0 plays the ten (reverses), seat 2 jumps with the other copy
        let mut seats: Vec<Box<dyn Strategy>> = vec![
            Scripted::boxed(vec![PlayDecision::Play(ten)]),
            Scripted::boxed(vec![]),
            Box::new(FirstStrategy),
        ];

        let (record, stats, _) = run_steps(&mut table, &mut seats, 1);

        assert_eq!(record.jumps[SeatId::new(2)], 1);
        assert_eq!(table.current_player(), SeatId::new(2));
        assert_eq!(table.direction(), Direction::Backward);
        assert_eq!(table.hand(SeatId::new(2)).as_slice(), &[c(3, Suit::Hearts)]);
        assert_eq!(stats.playability[&2][JUMPS], 1);
    }

    #[test]
    fn test_pass_counts_as_legal_and_draws() {
        let mut table = Table::arranged(
            vec![vec![c(2, Suit::Clubs)], vec![c(3, Suit::Clubs)]],
            c(9, Suit::Hearts),
            vec![c(4, Suit::Spades), c(5, Suit::Spades)],
            vec![],
            RuleSet::default(),
        );
        let mut seats = vec![Scripted::boxed(vec![PlayDecision::Pass]), Scripted::boxed(vec![])];

        let (_, stats, _) = run_steps(&mut table, &mut seats, 1);

        assert_eq!(stats.playability[&1], [1, 1, 0]);
        assert_eq!(table.hand(SeatId::new(0)).len(), 2);
        assert_eq!(table.current_player(), SeatId::new(1));
    }

    #[test]
    fn test_empty_draw_pile_pauses() {
        let mut table = Table::arranged(
            vec![vec![c(2, Suit::Clubs)], vec![c(3, Suit::Clubs)]],
            c(9, Suit::Hearts),
            vec![c(4, Suit::Spades)],
            vec![c(5, Suit::Spades), c(6, Suit::Spades)],
            RuleSet::default(),
        );
        let mut seats = vec![Scripted::boxed(vec![]), Scripted::boxed(vec![])];

        let (record, stats, log) = run_steps(&mut table, &mut seats, 1);

        assert_eq!(record.pauses, 1);
        assert_eq!(stats.pauses, vec![vec![2, 1]]);
        assert_eq!(table.draw_pile().len(), 2);
        assert_eq!(log.count(|e| matches!(e, GameEvent::Paused { .. })), 1);
    }

    #[test]
    fn test_play_game_runs_to_a_winner() {
        let reference = crate::core::reference_deck(crate::core::standard_deck, 1);
        let mut table = Table::new(2, reference, RuleSet::default());
        let mut seats: Vec<Box<dyn Strategy>> =
            vec![Box::new(FirstStrategy), Box::new(FirstStrategy)];
        let mut rng = GameRng::new(42);
        let mut stats = RunStats::new(2);
        let mut log = EventLog::new();

        let record = TurnEngine::new(&mut table, &mut seats, &mut rng, &mut stats)
            .with_verify_integrity(true)
            .play_game(SeatId::new(0), 100_000, &mut log)
            .unwrap();

        let winner = record.winner().unwrap();
        assert!(table.hand(winner).is_empty());
        assert_eq!(stats.total_decisions(), record.steps);
        assert!(matches!(log.events()[0], GameEvent::Dealt { .. }));
    }

    #[test]
    fn test_budget_truncates_game() {
        let reference = crate::core::reference_deck(crate::core::standard_deck, 1);
        let mut table = Table::new(4, reference, RuleSet::default());
        let mut seats: Vec<Box<dyn Strategy>> = (0..4).map(|_| Scripted::boxed(vec![])).collect();
        let mut rng = GameRng::new(42);
        let mut stats = RunStats::new(4);

        let record = TurnEngine::new(&mut table, &mut seats, &mut rng, &mut stats)
            .play_game(SeatId::new(0), 25, &mut crate::engine::NoopObserver)
            .unwrap();

        assert_eq!(record.outcome, GameOutcome::Truncated);
        assert_eq!(record.steps, 25);
        assert_eq!(stats.total_decisions(), 25);
    }

    #[test]
    fn test_seat_count_mismatch() {
        let reference = crate::core::reference_deck(crate::core::standard_deck, 1);
        let mut table = Table::new(3, reference, RuleSet::default());
        let mut seats: Vec<Box<dyn Strategy>> = vec![Box::new(FirstStrategy)];
        let mut rng = GameRng::new(42);
        let mut stats = RunStats::new(3);

        let result = TurnEngine::new(&mut table, &mut seats, &mut rng, &mut stats).play_game(
            SeatId::new(0),
            10,
            &mut crate::engine::NoopObserver,
        );
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }
}
