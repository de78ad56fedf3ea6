//! All-combinations tournament.
//!
//! Every combination of two or more strategies from the list (in list order,
//! without repetition) plays one independent run. Runs execute in parallel
//! with rayon and share nothing but the stop flag. The identity with the most
//! wins in a matchup scores one point; on a tie the one listed first scores.

use log::{error, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::core::{GameRng, Result, RunConfig, SimError};
use crate::run::{RunController, StopHandle};
use crate::strategy::{by_name, lineup, registered};

/// Tournament settings.
#[derive(Clone, Debug)]
pub struct TournamentConfig {
    /// Strategy names, in the order matchups are built from.
    pub strategies: Vec<String>,

    /// Step budget for each matchup.
    pub iterations: u64,

    pub num_decks: usize,

    /// Worker threads. `None` uses rayon's global pool.
    pub threads: Option<usize>,

    pub seed: Option<u64>,

    pub verify_integrity: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            strategies: registered().iter().map(|f| f.name.to_string()).collect(),
            iterations: 10_000_000,
            num_decks: 2,
            threads: None,
            seed: None,
            verify_integrity: false,
        }
    }
}

impl TournamentConfig {
    pub fn with_strategies<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.strategies = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_decks(mut self, num_decks: usize) -> Self {
        self.num_decks = num_decks;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
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

    fn validate(&self) -> Result<()> {
        if self.strategies.len() < 2 {
            return Err(SimError::InvalidConfig(
                "a tournament needs at least two strategies".into(),
            ));
        }
        if let Some(unknown) = self.strategies.iter().find(|n| by_name(n).is_none()) {
            return Err(SimError::UnknownStrategy(unknown.clone()));
        }
        if self.threads == Some(0) {
            return Err(SimError::InvalidConfig("thread count must be positive".into()));
        }
        Ok(())
    }
}

/// One matchup's outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchupResult {
    pub strategies: Vec<String>,
    /// Wins per strategy, in `strategies` order.
    pub wins: Vec<u64>,
    pub games_completed: u64,
    /// Index into `strategies` of the matchup winner.
    pub winner: usize,
}

impl MatchupResult {
    #[must_use]
    pub fn winner_name(&self) -> &str {
        &self.strategies[self.winner]
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct TournamentReport {
    pub matchups: Vec<MatchupResult>,
    /// Matchups that failed or were skipped after a stop request.
    pub skipped: Vec<Vec<String>>,
    /// Points per strategy, most first.
    pub ranking: Vec<(String, u64)>,
}

/// Index combinations of `k` out of `n`, in lexicographic order.
#[must_use]
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k == 0 || k > n {
        return out;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());
        // Rightmost position that can still move
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return out;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}

/// Index of the first maximum.
fn first_max(wins: &[u64]) -> usize {
    let mut best = 0;
    for (i, &w) in wins.iter().enumerate() {
        if w > wins[best] {
            best = i;
        }
    }
    best
}

/// Run every matchup and rank the strategies by matchups won.
pub fn run_tournament(config: &TournamentConfig, stop: &StopHandle) -> Result<TournamentReport> {
    config.validate()?;

    let n = config.strategies.len();
    let mut rng = GameRng::from_seed_or_entropy(config.seed);
    let matchups: Vec<(Vec<String>, u64)> = (2..=n)
        .flat_map(|k| combinations(n, k))
        .map(|combo| {
            let names = combo.iter().map(|&i| config.strategies[i].clone()).collect();
            (names, rng.fork().seed())
        })
        .collect();
    info!(
        "Tournament: {} matchups over {:?}, {} steps each, seed {}",
        matchups.len(),
        config.strategies,
        config.iterations,
        rng.seed()
    );

    let play = || -> Vec<(Vec<String>, Option<MatchupResult>)> {
        matchups
            .par_iter()
            .map(|(names, seed)| {
                if stop.is_stop_requested() {
                    return (names.clone(), None);
                }
                match play_matchup(config, names, *seed, stop) {
                    Ok(result) => (names.clone(), Some(result)),
                    Err(err) => {
                        error!("Matchup {names:?} failed: {err}");
                        (names.clone(), None)
                    }
                }
            })
            .collect()
    };

    let outcomes = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SimError::InvalidConfig(format!("thread pool: {e}")))?
            .install(play),
        None => play(),
    };

    let mut report = TournamentReport::default();
    let mut points: Vec<(String, u64)> = config.strategies.iter().map(|s| (s.clone(), 0)).collect();
    for (names, outcome) in outcomes {
        let Some(result) = outcome else {
            report.skipped.push(names);
            continue;
        };
        info!("Matchup {:?}: wins {:?}", result.strategies, result.wins);
        info!(
            "Strategy {} has won the most games with {} games",
            result.winner_name(),
            result.wins[result.winner]
        );
        if let Some(entry) = points.iter_mut().find(|(name, _)| name.as_str() == result.winner_name()) {
            entry.1 += 1;
        }
        report.matchups.push(result);
    }

    points.sort_by(|a, b| b.1.cmp(&a.1));
    info!("Final ranking:");
    for (name, score) in &points {
        info!("\t{name}: {score}");
    }
    if !report.skipped.is_empty() {
        warn!("{} matchups skipped", report.skipped.len());
    }
    report.ranking = points;
    Ok(report)
}

fn play_matchup(
    config: &TournamentConfig,
    names: &[String],
    seed: u64,
    stop: &StopHandle,
) -> Result<MatchupResult> {
    let mut rng = GameRng::new(seed);
    let strategies = lineup(names, &mut rng)?;
    let run_config = RunConfig::new(names.len())
        .with_iteration_budget(config.iterations)
        .with_decks(config.num_decks)
        .with_tolerate_illegal(true)
        .with_random_first_player(true)
        .with_shuffle_seats(true)
        .with_verify_integrity(config.verify_integrity)
        .with_seed(rng.fork().seed());

    let mut controller =
        RunController::new(run_config, strategies)?.with_stop_handle(stop.clone());
    let report = controller.run()?;
    if let Some(err) = report.error {
        return Err(err);
    }

    let wins = controller.into_stats().wins;
    Ok(MatchupResult {
        strategies: names.to_vec(),
        winner: first_max(&wins),
        games_completed: report.games_completed,
        wins,
    })
}
