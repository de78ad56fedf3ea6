//! Runs across invocations: persistence, cancellation, reporting and the
//! tournament.

use std::thread;
use std::time::Duration;

use mao_sim::core::{GameRng, RunConfig};
use mao_sim::run::{summarize, RunController, StatsStore, StopHandle};
use mao_sim::strategy::{lineup, registered};
use mao_sim::tournament::{combinations, run_tournament, TournamentConfig};
use tempfile::tempdir;

fn controller(names: &[&str], budget: u64, seed: u64) -> RunController {
    let config = RunConfig::new(names.len()).with_iteration_budget(budget).with_seed(seed);
    let mut rng = GameRng::new(seed);
    RunController::new(config, lineup(names, &mut rng).unwrap()).unwrap()
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_runs_accumulate_in_state_file() {
    let dir = tempdir().unwrap();
    let names = ["counting", "follow_up"];
    let store = StatsStore::for_run(dir.path(), "mao", 2, 1, &names);

    let mut first = controller(&names, 5_000, 1).with_stats(store.load(2).unwrap()).unwrap();
    let report_a = first.run().unwrap();
    store.save(first.stats()).unwrap();

    let mut second = controller(&names, 5_000, 2).with_stats(store.load(2).unwrap()).unwrap();
    let report_b = second.run().unwrap();
    store.save(second.stats()).unwrap();

    let saved = store.load(2).unwrap();
    let games = report_a.games_completed + report_b.games_completed;
    assert_eq!(saved.total_wins(), games);
    assert_eq!(saved.games_completed() as u64, games);
    assert_eq!(saved.total_decisions(), report_a.steps_used + report_b.steps_used);
}

#[test]
fn test_state_file_uses_shared_key_names() {
    let dir = tempdir().unwrap();
    let store = StatsStore::new(dir.path().join("state.json"));
    let mut run = controller(&["first", "first"], 2_000, 4);
    run.run().unwrap();
    store.save(run.stats()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();

    for key in ["dict_cartes_prob", "pauses", "maos", "iter_partides"] {
        assert!(raw.get(key).is_some(), "missing {key}");
    }
    assert_eq!(raw["maos"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_stop_from_another_thread() {
    let mut run = controller(&["random", "random", "random"], u64::MAX, 9);
    let stop = run.stop_handle();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        stop.request_stop()
    });
    let report = run.run().unwrap();

    assert!(stopper.join().unwrap());
    assert!(report.stopped);
    assert!(!report.truncated);
    assert_eq!(run.stats().games_completed() as u64, report.games_completed);
}

#[test]
fn test_shared_stop_handle() {
    let stop = StopHandle::new();
    let mut run = controller(&["first", "first"], u64::MAX, 3).with_stop_handle(stop.clone());
    stop.request_stop();

    let report = run.run().unwrap();

    assert!(report.stopped);
    assert_eq!(report.games_completed, 1);
}

// =============================================================================
// Reporting
// =============================================================================

#[test]
fn test_summary_after_run() {
    let mut run = controller(&["random", "first", "counting", "follow_up"], 20_000, 12);
    let report = run.run().unwrap();

    let summary = summarize(run.stats(), 4);

    assert_eq!(summary.wins.iter().sum::<u64>(), report.games_completed);
    assert!(summary.mean_hand_size > 0.0);
    assert!(summary.mean_game_length > 0.0);
    for line in &summary.playability {
        assert!((0.0..=1.0).contains(&line.playable));
    }
}

// =============================================================================
// Tournament
// =============================================================================

#[test]
fn test_every_registered_combination_plays() {
    let n = registered().len();
    let expected: usize = (2..=n).map(|k| combinations(n, k).len()).sum();
    let config = TournamentConfig::default().with_iterations(2_000).with_seed(21);

    let report = run_tournament(&config, &StopHandle::new()).unwrap();

    assert_eq!(expected, 26);
    assert_eq!(report.matchups.len(), expected);
    assert_eq!(report.ranking.len(), n);
    assert_eq!(report.ranking.iter().map(|(_, p)| *p as usize).sum::<usize>(), expected);
    for matchup in &report.matchups {
        let best = *matchup.wins.iter().max().unwrap();
        let first_best = matchup.wins.iter().position(|&w| w == best).unwrap();
        assert_eq!(matchup.winner, first_best);
    }
}

#[test]
fn test_tournament_is_reproducible() {
    let config = TournamentConfig::default()
        .with_strategies(&["random", "counting"])
        .with_iterations(3_000)
        .with_seed(4);

    let a = run_tournament(&config, &StopHandle::new()).unwrap();
    let b = run_tournament(&config, &StopHandle::new()).unwrap();

    assert_eq!(a.matchups, b.matchups);
}
