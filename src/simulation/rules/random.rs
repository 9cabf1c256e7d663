//! Random rule for testing and baselines.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::trait_::DecisionRule;
use crate::round::{Agent, Decision};

/// Uniformly random decision for every agent, from a seeded stream.
pub struct RandomRule {
    rng: StdRng,
}

impl RandomRule {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DecisionRule for RandomRule {
    fn decide(&mut self, _agent: &Agent, _round: u32) -> Decision {
        Decision::all()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Decision::Quit)
    }

    fn name(&self) -> &str {
        "random"
    }
}
