//! Cooperative stop flag.
//!
//! A run checks the flag once per completed game, so a stop request always
//! lets the game in progress finish and be recorded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::warn;

/// Cloneable handle to a shared stop flag. Safe to trigger from any thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop after the current game.
    ///
    /// Returns `true` for the first request, `false` for repeats.
    pub fn request_stop(&self) -> bool {
        let first = !self.flag.swap(true, Ordering::SeqCst);
        if first {
            warn!("Stop requested. Finishing current game before stopping...");
        } else {
            warn!("Stop already requested. Waiting for current game to finish...");
        }
        first
    }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
