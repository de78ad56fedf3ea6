//! End-of-run summary.

use log::info;
use serde::Serialize;

use super::stats::{RunStats, DECISIONS, JUMPS, LEGAL};

/// Playability at one hand size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandSizeLine {
    pub hand_size: usize,
    /// Share of decisions that were a legal play or a pass.
    pub playable: f64,
    pub jumps: u64,
    pub samples: u64,
}

/// Numbers derived from accumulated statistics.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub playability: Vec<HandSizeLine>,
    /// Mean hand size over all decisions.
    pub mean_hand_size: f64,
    /// Mean hand size at pauses, per seat.
    pub pause_means: Vec<f64>,
    /// Mean hand size at pauses over all seats.
    pub pause_mean: f64,
    pub pauses_per_game: f64,
    pub wins: Vec<u64>,
    pub mean_game_length: f64,
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Derive the summary numbers. Empty inputs give zeros, never NaN.
#[must_use]
pub fn summarize(stats: &RunStats, player_count: usize) -> Summary {
    let playability: Vec<HandSizeLine> = stats
        .playability
        .iter()
        .map(|(&hand_size, entry)| HandSizeLine {
            hand_size,
            playable: ratio(entry[LEGAL] as f64, entry[DECISIONS] as f64),
            jumps: entry[JUMPS],
            samples: entry[DECISIONS],
        })
        .collect();

    let weighted: u64 = playability.iter().map(|l| l.hand_size as u64 * l.samples).sum();
    let samples: u64 = playability.iter().map(|l| l.samples).sum();

    let mut pause_sums = vec![0usize; player_count];
    for pause in &stats.pauses {
        for (sum, size) in pause_sums.iter_mut().zip(pause) {
            *sum += size;
        }
    }
    let pause_count = stats.pauses.len() as f64;
    let pause_means: Vec<f64> = pause_sums.iter().map(|&s| ratio(s as f64, pause_count)).collect();
    let pause_mean = ratio(pause_means.iter().sum(), player_count as f64);

    let games = stats.games_completed() as f64;
    let total_length: u64 = stats.game_lengths.iter().sum();

    Summary {
        playability,
        mean_hand_size: ratio(weighted as f64, samples as f64),
        pause_means,
        pause_mean,
        pauses_per_game: ratio(pause_count, stats.total_wins() as f64),
        wins: stats.wins.clone(),
        mean_game_length: ratio(total_length as f64, games),
    }
}

/// Log the summary at info level and return it.
pub fn log_summary(stats: &RunStats, player_count: usize) -> Summary {
    let summary = summarize(stats, player_count);

    let jump_width = summary.playability.iter().map(|l| l.jumps).max().unwrap_or(0).to_string().len();
    let sample_width = summary.playability.iter().map(|l| l.samples).max().unwrap_or(0).to_string().len();
    let mut table = String::from("Final probabilities:\n");
    for line in &summary.playability {
        table.push_str(&format!(
            "\tWith {:2} cards: {:.8} with {:>jw$} jumps (sample {:>sw$})\n",
            line.hand_size,
            line.playable,
            line.jumps,
            line.samples,
            jw = jump_width,
            sw = sample_width,
        ));
    }
    info!("{table}");
    info!("Mean cards in hand: {}", summary.mean_hand_size);

    if !stats.pauses.is_empty() {
        info!("Mean cards per seat at pauses: {:?}", summary.pause_means);
        info!("Mean cards at pauses: {}", summary.pause_mean);
        info!("Mean pauses per game: {}", summary.pauses_per_game);
    }

    info!("Wins per player: {:?}", summary.wins);
    info!("Mean steps per game: {}", summary.mean_game_length);
    summary
}
