//! The run controller: plays games back-to-back on one table until the step
//! budget is spent or a stop is requested.
//!
//! ## Seats and identities
//!
//! A *seat* is a position at the table for one game. An *identity* is the
//! strategy being benchmarked, numbered by its position in the lineup the
//! controller was built with. With seat shuffling on, the strategies move
//! between seats after every game and the controller keeps the
//! seat → identity mapping, so wins and illegal counts always land on the
//! identity.
//!
//! ## Failure
//!
//! Each game collects its statistics separately and they are merged into the
//! run totals once the game ends normally. A game that fails with a fatal
//! error contributes only its steps; the run stops and the report carries
//! the error. The table is swept after every game, failed or not, so the
//! same controller can run again.

use std::time::Instant;

use log::{error, info};

use crate::core::{reference_deck, GameRng, Result, RunConfig, SeatId, SimError};
use crate::engine::{GameEvent, GameObserver, GameOutcome, NoopObserver, Table, TurnEngine};
use crate::strategy::Strategy;

use super::stats::RunStats;
use super::stop::StopHandle;

/// What a run did.
#[derive(Debug, Default)]
pub struct RunReport {
    pub games_completed: u64,
    pub steps_used: u64,
    /// The last game hit the step budget before anyone won.
    pub truncated: bool,
    /// Games won during this run, per identity.
    pub wins: Vec<u64>,
    pub illegal_plays: Vec<u64>,
    pub illegal_jumps: Vec<u64>,
    /// The run ended early because a stop was requested.
    pub stopped: bool,
    /// The fatal error that ended the run, if any.
    pub error: Option<SimError>,
}

impl RunReport {
    fn new(identities: usize) -> Self {
        Self {
            wins: vec![0; identities],
            illegal_plays: vec![0; identities],
            illegal_jumps: vec![0; identities],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Logs throughput every `interval` steps, then forwards every event.
struct Progress<'o, O: ?Sized> {
    inner: &'o mut O,
    interval: u64,
    offset: u64,
    /// Steps completed in the game in progress.
    game_steps: u64,
    budget: u64,
    started: Instant,
}

impl<O: GameObserver + ?Sized> GameObserver for Progress<'_, O> {
    fn on_event(&mut self, event: &GameEvent, table: &Table) {
        if let GameEvent::StepCompleted { step } = event {
            self.game_steps = *step;
            let total = self.offset + step;
            if total % self.interval == 0 {
                let elapsed = self.started.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 { total as f64 / elapsed } else { 0.0 };
                info!("Step {total}/{} ({rate:.0} steps/s)", self.budget);
            }
        }
        self.inner.on_event(event, table);
    }
}

/// Plays repeated games with a fixed lineup.
pub struct RunController {
    config: RunConfig,
    strategies: Vec<Box<dyn Strategy>>,
    seat_to_identity: Vec<usize>,
    identity_names: Vec<&'static str>,
    table: Table,
    rng: GameRng,
    stats: RunStats,
    stop: StopHandle,
}

impl RunController {
    /// `strategies[i]` is identity `i` and starts in seat `i`.
    pub fn new(config: RunConfig, strategies: Vec<Box<dyn Strategy>>) -> Result<Self> {
        config.validate()?;
        if strategies.len() != config.player_count {
            return Err(SimError::InvalidConfig(format!(
                "{} strategies for {} players",
                strategies.len(),
                config.player_count
            )));
        }

        let reference = reference_deck(config.deck_builder, config.num_decks);
        let table = Table::new(config.player_count, reference, config.rules.clone());
        let rng = GameRng::from_seed_or_entropy(config.seed);
        let identity_names = strategies.iter().map(|s| s.name()).collect();

        Ok(Self {
            seat_to_identity: (0..config.player_count).collect(),
            stats: RunStats::new(config.player_count),
            identity_names,
            strategies,
            table,
            rng,
            config,
            stop: StopHandle::new(),
        })
    }

    /// Continue from previously accumulated statistics.
    pub fn with_stats(mut self, stats: RunStats) -> Result<Self> {
        if stats.wins.len() != self.config.player_count {
            return Err(SimError::InvalidState(format!(
                "statistics hold wins for {} identities, expected {}",
                stats.wins.len(),
                self.config.player_count
            )));
        }
        self.stats = stats;
        Ok(self)
    }

    /// Share a stop flag with the caller (a signal handler, say).
    #[must_use]
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    #[must_use]
    pub fn into_stats(self) -> RunStats {
        self.stats
    }

    #[must_use]
    pub fn identity_names(&self) -> &[&'static str] {
        &self.identity_names
    }

    /// Identity currently playing each seat.
    #[must_use]
    pub fn seat_to_identity(&self) -> &[usize] {
        &self.seat_to_identity
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn run(&mut self) -> Result<RunReport> {
        self.run_observed(&mut NoopObserver)
    }

    /// Play until the budget is spent, a stop is requested or a game fails.
    ///
    /// Fatal game errors are returned inside the report; anything else
    /// (a broken deal, say) is returned as `Err`.
    pub fn run_observed<O>(&mut self, observer: &mut O) -> Result<RunReport>
    where
        O: GameObserver + ?Sized,
    {
        let budget = self.config.iteration_budget;
        let player_count = self.config.player_count;
        let mut report = RunReport::new(player_count);
        let mut progress = Progress {
            inner: observer,
            interval: (budget / 10).clamp(1, 1_000_000),
            offset: 0,
            game_steps: 0,
            budget,
            started: Instant::now(),
        };

        info!(
            "Starting run: {player_count} players, {} decks, {budget} steps, seed {}, lineup {:?}",
            self.config.num_decks,
            self.rng.seed(),
            self.identity_names
        );

        while report.steps_used < budget {
            let first = if self.config.random_first_player {
                SeatId::new(self.rng.gen_range_usize(0..player_count) as u8)
            } else {
                SeatId::new(0)
            };

            let mut game_stats = RunStats::new(player_count);
            progress.offset = report.steps_used;
            progress.game_steps = 0;
            let played = TurnEngine::new(
                &mut self.table,
                &mut self.strategies,
                &mut self.rng,
                &mut game_stats,
            )
            .with_tolerate_illegal(self.config.tolerate_illegal)
            .with_verify_integrity(self.config.verify_integrity)
            .play_game(first, budget - report.steps_used, &mut progress);
            self.table.sweep();

            let record = match played {
                Ok(record) => record,
                Err(err) if err.is_fatal_to_game() => {
                    // The failing step never completed but was still taken
                    report.steps_used += progress.game_steps + 1;
                    error!("Game {} failed, stopping run: {err}", report.games_completed + 1);
                    report.error = Some(err);
                    break;
                }
                Err(err) => return Err(err),
            };

            self.stats.merge(game_stats);
            report.steps_used += record.steps;
            for seat in SeatId::all(player_count) {
                let identity = self.seat_to_identity[seat.index()];
                report.illegal_plays[identity] += record.illegal_plays[seat];
                report.illegal_jumps[identity] += record.illegal_jumps[seat];
            }

            match record.outcome {
                GameOutcome::Won(seat) => {
                    let identity = self.seat_to_identity[seat.index()];
                    self.stats.record_win(identity);
                    self.stats.record_game_length(record.steps);
                    report.wins[identity] += 1;
                    report.games_completed += 1;
                }
                GameOutcome::Truncated => report.truncated = true,
            }

            if self.config.shuffle_seats {
                self.shuffle_seats();
            }

            if self.stop.is_stop_requested() {
                info!("Stopping after {} games", report.games_completed);
                report.stopped = true;
                break;
            }
        }

        info!(
            "Run finished: {} games in {} steps, wins {:?}",
            report.games_completed, report.steps_used, report.wins
        );
        Ok(report)
    }

    /// Move the strategies to new seats, keeping track of their identities.
    fn shuffle_seats(&mut self) {
        let strategies = std::mem::take(&mut self.strategies);
        let mut pairs: Vec<(Box<dyn Strategy>, usize)> =
            strategies.into_iter().zip(self.seat_to_identity.iter().copied()).collect();
        self.rng.shuffle(&mut pairs);
        (self.strategies, self.seat_to_identity) = pairs.into_iter().unzip();
    }
}
