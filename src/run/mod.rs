//! Running many games back-to-back and keeping score.
//!
//! - `RunController`: the outer loop over games
//! - `RunStats`: counters accumulated across games and runs
//! - `StatsStore`: JSON persistence of `RunStats`
//! - `StopHandle`: cooperative cancellation
//! - `report`: end-of-run summary

pub mod controller;
pub mod persistence;
pub mod report;
pub mod stats;
pub mod stop;

pub use controller::{RunController, RunReport};
pub use persistence::{file_stem, StatsStore};
pub use report::{log_summary, summarize, HandSizeLine, Summary};
pub use stats::RunStats;
pub use stop::StopHandle;
