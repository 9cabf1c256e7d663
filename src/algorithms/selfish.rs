//! Popularity-adaptive policy.

use rand::RngCore;

use super::{solve_optimal, Assignment, AssignmentAlgorithm};
use crate::availability::OptionSet;
use crate::error::Result;
use crate::matrix::AssignmentMatrix;
use crate::stats::AdaptiveStatistics;

/// Optimal assignment maximizing total acceptance-probability mass.
///
/// Agents go where they are individually likely to stay rather than where
/// total welfare is highest. The reported payoff of each triple is still the
/// agent's real payoff, not the probability weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfishMatching;

impl AssignmentAlgorithm for SelfishMatching {
    fn assign(
        &self,
        options: &[OptionSet],
        resource_count: usize,
        stats: &AdaptiveStatistics,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>> {
        let matrix = AssignmentMatrix::probabilities(options, resource_count, stats);
        solve_optimal(&matrix, options)
    }

    fn name(&self) -> &str {
        "self"
    }
}
