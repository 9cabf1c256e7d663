//! Welfare-maximizing policy.

use rand::RngCore;

use super::{solve_optimal, Assignment, AssignmentAlgorithm};
use crate::availability::OptionSet;
use crate::error::Result;
use crate::matrix::AssignmentMatrix;
use crate::stats::AdaptiveStatistics;

/// Optimal assignment maximizing the sum of assigned payoffs.
///
/// Ties are broken deterministically by the solver's column order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FairMatching;

impl AssignmentAlgorithm for FairMatching {
    fn assign(
        &self,
        options: &[OptionSet],
        resource_count: usize,
        _stats: &AdaptiveStatistics,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>> {
        let matrix = AssignmentMatrix::payoffs(options, resource_count);
        solve_optimal(&matrix, options)
    }

    fn name(&self) -> &str {
        "fair"
    }
}
