//! Loading and saving run statistics as JSON.
//!
//! Results accumulate across invocations: a run starts from whatever the
//! state file holds and writes the merged totals back when it ends.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::core::{Result, SimError};

use super::stats::RunStats;

/// File name (without extension) for a run: `{prefix}_{players}_{decks}_{lineup}`.
///
/// `lineup` is the single strategy name when every seat plays the same
/// strategy, otherwise all names joined by `_`.
///
/// ```
/// use mao_sim::run::file_stem;
///
/// assert_eq!(file_stem("mao", 4, 1, &["first"; 4]), "mao_4_1_first");
/// assert_eq!(file_stem("mao", 2, 2, &["random", "first"]), "mao_2_2_random_first");
/// ```
#[must_use]
pub fn file_stem<S: AsRef<str>>(
    prefix: &str,
    player_count: usize,
    num_decks: usize,
    names: &[S],
) -> String {
    let lineup = match names.split_first() {
        Some((first, rest)) if rest.iter().all(|n| n.as_ref() == first.as_ref()) => {
            first.as_ref().to_string()
        }
        _ => names.iter().map(|n| n.as_ref()).collect::<Vec<&str>>().join("_"),
    };
    format!("{prefix}_{player_count}_{num_decks}_{lineup}")
}

/// A JSON state file holding `RunStats`.
#[derive(Clone, Debug)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The state file for a run, inside `dir`.
    pub fn for_run<S: AsRef<str>>(
        dir: &Path,
        prefix: &str,
        player_count: usize,
        num_decks: usize,
        names: &[S],
    ) -> Self {
        let stem = file_stem(prefix, player_count, num_decks, names);
        Self::new(dir.join(format!("{stem}.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved statistics, or empty ones when the file does not exist.
    ///
    /// Saved win counts must cover exactly `player_count` identities.
    pub fn load(&self, player_count: usize) -> Result<RunStats> {
        if !self.path.exists() {
            warn!("File {} does not exist", self.path.display());
            return Ok(RunStats::new(player_count));
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut stats: RunStats = serde_json::from_reader(reader)?;
        if stats.wins.is_empty() {
            stats.wins = vec![0; player_count];
        }
        if stats.wins.len() != player_count {
            return Err(SimError::InvalidState(format!(
                "{} holds wins for {} players, expected {player_count}",
                self.path.display(),
                stats.wins.len()
            )));
        }
        if let Some(pause) = stats.pauses.iter().find(|p| p.len() != player_count) {
            return Err(SimError::InvalidState(format!(
                "{} holds a pause record for {} seats, expected {player_count}",
                self.path.display(),
                pause.len()
            )));
        }

        info!(
            "Loaded {} games and {} decisions from {}",
            stats.games_completed(),
            stats.total_decisions(),
            self.path.display()
        );
        Ok(stats)
    }

    /// Write statistics, creating parent directories as needed.
    pub fn save(&self, stats: &RunStats) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut writer, stats)?;
        writer.flush()?;
        info!("Saved statistics to {}", self.path.display());
        Ok(())
    }
}
