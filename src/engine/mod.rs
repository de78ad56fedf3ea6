//! Game engine: table state, the turn loop and the pause protocol.
//!
//! - `Table`: piles, hands, top card, direction and stack counter
//! - `TurnEngine`: plays one game on a table
//! - `run_pause`: caps hands and rebuilds the draw pile
//! - `GameEvent` / `GameObserver`: read-only hooks into a running game

pub mod table;
pub mod turn;
pub mod pause;
pub mod event;
pub mod record;

pub use table::Table;
pub use turn::TurnEngine;
pub use pause::run_pause;
pub use event::{EventLog, GameEvent, GameObserver, NoopObserver};
pub use record::{GameOutcome, GameRecord};
