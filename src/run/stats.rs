//! Accumulated run statistics.
//!
//! The JSON layout is shared with existing result files, so field names on
//! the wire differ from the Rust names:
//!
//! | field          | JSON key           | meaning                                         |
//! |----------------|--------------------|-------------------------------------------------|
//! | `playability`  | `dict_cartes_prob` | hand size → `[legal_plays, decisions, jumps]`   |
//! | `pauses`       | `pauses`           | hand size of every seat at each pause           |
//! | `wins`         | `maos`             | games won per strategy identity                 |
//! | `game_lengths` | `iter_partides`    | decision steps of every completed game          |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Index of the legal play counter in a playability entry.
pub const LEGAL: usize = 0;
/// Index of the decision counter in a playability entry.
pub const DECISIONS: usize = 1;
/// Index of the successful jump counter in a playability entry.
pub const JUMPS: usize = 2;

/// Statistics accumulated across games (and across runs, once persisted).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunStats {
    #[serde(rename = "dict_cartes_prob")]
    pub playability: BTreeMap<usize, [u64; 3]>,

    pub pauses: Vec<Vec<usize>>,

    #[serde(rename = "maos")]
    pub wins: Vec<u64>,

    #[serde(rename = "iter_partides")]
    pub game_lengths: Vec<u64>,
}

impl RunStats {
    /// Empty statistics for `player_count` identities.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            wins: vec![0; player_count],
            ..Self::default()
        }
    }

    fn entry(&mut self, hand_size: usize) -> &mut [u64; 3] {
        self.playability.entry(hand_size).or_insert([0; 3])
    }

    /// A regular-turn decision was requested at this hand size.
    pub fn record_decision(&mut self, hand_size: usize) {
        self.entry(hand_size)[DECISIONS] += 1;
    }

    /// The decision was a legal play or an explicit pass.
    pub fn record_legal(&mut self, hand_size: usize) {
        self.entry(hand_size)[LEGAL] += 1;
    }

    /// A jump-in succeeded from this hand size.
    pub fn record_jump(&mut self, hand_size: usize) {
        self.entry(hand_size)[JUMPS] += 1;
    }

    pub fn record_pause(&mut self, hand_sizes: Vec<usize>) {
        self.pauses.push(hand_sizes);
    }

    pub fn record_win(&mut self, identity: usize) {
        if identity >= self.wins.len() {
            self.wins.resize(identity + 1, 0);
        }
        self.wins[identity] += 1;
    }

    pub fn record_game_length(&mut self, steps: u64) {
        self.game_lengths.push(steps);
    }

    /// Fold per-game counters into these totals. Wins and game lengths are
    /// recorded by the caller once the game's outcome is known.
    pub fn merge(&mut self, game: RunStats) {
        for (hand_size, counts) in game.playability {
            let entry = self.entry(hand_size);
            for (total, count) in entry.iter_mut().zip(counts) {
                *total += count;
            }
        }
        self.pauses.extend(game.pauses);
    }

    #[must_use]
    pub fn games_completed(&self) -> usize {
        self.game_lengths.len()
    }

    #[must_use]
    pub fn total_decisions(&self) -> u64 {
        self.playability.values().map(|e| e[DECISIONS]).sum()
    }

    #[must_use]
    pub fn total_wins(&self) -> u64 {
        self.wins.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = RunStats::new(3);
        stats.record_decision(3);
        stats.record_legal(3);
        stats.record_decision(3);
        stats.record_decision(4);
        stats.record_jump(4);

        assert_eq!(stats.playability[&3], [1, 2, 0]);
        assert_eq!(stats.playability[&4], [0, 1, 1]);
        assert_eq!(stats.total_decisions(), 3);
    }

    #[test]
    fn test_wins_and_lengths() {
        let mut stats = RunStats::new(2);
        stats.record_win(1);
        stats.record_win(1);
        stats.record_game_length(40);
        stats.record_game_length(12);

        assert_eq!(stats.wins, vec![0, 2]);
        assert_eq!(stats.total_wins(), 2);
        assert_eq!(stats.games_completed(), 2);
    }

    #[test]
    fn test_merge_adds_counters() {
        let mut totals = RunStats::new(2);
        totals.record_decision(3);
        totals.record_pause(vec![5, 5]);

        let mut game = RunStats::new(2);
        game.record_decision(3);
        game.record_legal(3);
        game.record_jump(6);
        game.record_pause(vec![7, 1]);
        totals.merge(game);

        assert_eq!(totals.playability[&3], [1, 2, 0]);
        assert_eq!(totals.playability[&6], [0, 0, 1]);
        assert_eq!(totals.pauses, vec![vec![5, 5], vec![7, 1]]);
        assert_eq!(totals.wins, vec![0, 0]);
    }

    #[test]
    fn test_json_keys() {
        let mut stats = RunStats::new(2);
        stats.record_decision(3);
        stats.record_pause(vec![6, 2]);
        stats.record_win(0);
        stats.record_game_length(9);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dict_cartes_prob": {"3": [0, 1, 0]},
                "pauses": [[6, 2]],
                "maos": [1, 0],
                "iter_partides": [9]
            })
        );
    }

    #[test]
    fn test_missing_keys_default() {
        let stats: RunStats = serde_json::from_str(r#"{"maos": [4, 5]}"#).unwrap();
        assert_eq!(stats.wins, vec![4, 5]);
        assert!(stats.playability.is_empty());
        assert!(stats.pauses.is_empty());
    }
}
