//! Random policy for baselines.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::RngCore;

use super::feasibility::{ensure_complete, max_matching_size};
use super::{Assignment, AssignmentAlgorithm};
use crate::availability::OptionSet;
use crate::error::{MatchingError, Result};
use crate::matrix::AssignmentMatrix;
use crate::stats::AdaptiveStatistics;
use crate::ResourceId;

/// Independent draws attempted before falling back to sequential placement.
const MAX_DRAWS: usize = 64;

/// Uniformly random complete assignment over feasible pairs.
///
/// Every agent draws one of its options independently and the whole draw is
/// repeated until no two agents collide. Each complete matching has the same
/// probability of surviving, so accepted draws are uniform over them.
///
/// When the options are so contested that [`MAX_DRAWS`] draws all collide,
/// agents are instead placed one at a time in random order, each taking a
/// uniform option that still leaves a complete matching for the rest. That
/// fallback always succeeds on a feasible instance but is not exactly
/// uniform.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMatching;

impl AssignmentAlgorithm for RandomMatching {
    fn assign(
        &self,
        options: &[OptionSet],
        resource_count: usize,
        _stats: &AdaptiveStatistics,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>> {
        let matrix = AssignmentMatrix::payoffs(options, resource_count);
        ensure_complete(&matrix)?;
        let columns = matrix.feasible_columns();

        let picks = match (0..MAX_DRAWS).find_map(|_| draw_distinct(&columns, rng)) {
            Some(picks) => picks,
            None => place_sequentially(&columns, resource_count, rng)?,
        };

        let mut result = options
            .iter()
            .zip(picks)
            .map(|(set, resource)| {
                let payoff = set
                    .payoff(resource)
                    .ok_or(MatchingError::Unmatchable { agent: set.agent() })?;
                Ok(Assignment {
                    agent: set.agent(),
                    resource,
                    payoff,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        result.sort_by_key(|a| a.agent);
        Ok(result)
    }

    fn name(&self) -> &str {
        "rand"
    }
}

/// One independent uniform pick per row, or `None` on any collision.
fn draw_distinct(columns: &[Vec<ResourceId>], rng: &mut dyn RngCore) -> Option<Vec<ResourceId>> {
    let mut taken = BTreeSet::new();
    columns
        .iter()
        .map(|cols| cols.choose(rng).copied().filter(|&r| taken.insert(r)))
        .collect()
}

/// Places rows in random order, each on a uniform option that keeps the
/// remaining rows completable.
fn place_sequentially(
    columns: &[Vec<ResourceId>],
    resource_count: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<ResourceId>> {
    let mut order: Vec<usize> = (0..columns.len()).collect();
    order.shuffle(rng);

    let mut taken: BTreeSet<ResourceId> = BTreeSet::new();
    let mut picks = vec![0; columns.len()];

    for (pos, &row) in order.iter().enumerate() {
        let rest: Vec<Vec<ResourceId>> =
            order[pos + 1..].iter().map(|&r| columns[r].clone()).collect();

        let mut candidates: Vec<ResourceId> = columns[row]
            .iter()
            .copied()
            .filter(|r| !taken.contains(r))
            .collect();
        candidates.shuffle(rng);

        let resource = candidates
            .into_iter()
            .find(|&r| {
                taken.insert(r);
                let ok = max_matching_size(&rest, resource_count, &taken) == rest.len();
                taken.remove(&r);
                ok
            })
            .ok_or(MatchingError::AssignmentInfeasible {
                agents: columns.len(),
                matched: pos,
            })?;
        taken.insert(resource);
        picks[row] = resource;
    }

    Ok(picks)
}
