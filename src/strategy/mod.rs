//! Player strategies.
//!
//! A strategy is asked for three kinds of decision: a regular play on its
//! own turn, an optional out-of-turn jump, and a discard during a pause.
//! Every call receives a `SeatView` of what the seat may see plus the public
//! `TurnInfo`.
//!
//! ## Built-in strategies
//!
//! - `random`: uniform among legal options
//! - `first`: first legal card in hand order
//! - `counting`: card counting over unseen cards
//! - `follow_up`: maximizes follow-up plays left in hand
//! - `jump_follow`: jumps in only when it can keep playing

pub mod traits;
pub mod random;
pub mod first;
pub mod counting;
pub mod follow_up;
pub mod jump_follow;
pub mod registry;

pub use traits::{PlayDecision, SeatView, Strategy, TurnInfo};
pub use random::RandomStrategy;
pub use first::FirstStrategy;
pub use counting::CountingStrategy;
pub use follow_up::FollowUpStrategy;
pub use jump_follow::JumpFollowStrategy;
pub use registry::{by_name, lineup, registered, StrategyFactory};
