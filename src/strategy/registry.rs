//! Named strategy factories.
//!
//! To add a strategy: implement `Strategy`, give it a stable `NAME`, and add
//! a `StrategyFactory` entry below. Keep the ordering stable; the tournament
//! builds its matchups in registry order.

use crate::core::{GameRng, Result, SimError};

use super::counting::CountingStrategy;
use super::first::FirstStrategy;
use super::follow_up::FollowUpStrategy;
use super::jump_follow::JumpFollowStrategy;
use super::random::RandomStrategy;
use super::traits::Strategy;

/// Factory definition for constructing strategies.
pub struct StrategyFactory {
    pub name: &'static str,
    pub summary: &'static str,
    pub make: fn(seed: u64) -> Box<dyn Strategy>,
}

static FACTORIES: &[StrategyFactory] = &[
    StrategyFactory {
        name: RandomStrategy::NAME,
        summary: "uniformly random legal card",
        make: make_random,
    },
    StrategyFactory {
        name: FirstStrategy::NAME,
        summary: "first legal card in hand order",
        make: make_first,
    },
    StrategyFactory {
        name: CountingStrategy::NAME,
        summary: "counts unseen cards, switches to its strongest suit",
        make: make_counting,
    },
    StrategyFactory {
        name: FollowUpStrategy::NAME,
        summary: "keeps the most follow-up plays in hand",
        make: make_follow_up,
    },
    StrategyFactory {
        name: JumpFollowStrategy::NAME,
        summary: "first legal card, jumps in only with a follow-up in hand",
        make: make_jump_follow,
    },
];

/// Returns the statically registered strategy factories.
pub fn registered() -> &'static [StrategyFactory] {
    FACTORIES
}

/// Finds a registered factory by name.
pub fn by_name(name: &str) -> Option<&'static StrategyFactory> {
    registered().iter().find(|factory| factory.name == name)
}

/// Builds one strategy per name, each with its own forked seed.
pub fn lineup<S: AsRef<str>>(names: &[S], rng: &mut GameRng) -> Result<Vec<Box<dyn Strategy>>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let factory = by_name(name).ok_or_else(|| SimError::UnknownStrategy(name.to_string()))?;
            Ok((factory.make)(rng.fork().seed()))
        })
        .collect()
}

fn make_random(seed: u64) -> Box<dyn Strategy> {
    Box::new(RandomStrategy::new(seed))
}

fn make_first(_seed: u64) -> Box<dyn Strategy> {
    Box::new(FirstStrategy)
}

fn make_counting(_seed: u64) -> Box<dyn Strategy> {
    Box::new(CountingStrategy)
}

fn make_follow_up(_seed: u64) -> Box<dyn Strategy> {
    Box::new(FollowUpStrategy)
}

fn make_jump_follow(_seed: u64) -> Box<dyn Strategy> {
    Box::new(JumpFollowStrategy)
}
