//! Matching engine.
//!
//! Three allocation policies solve a period's assignment problem:
//!
//! - [`FairMatching`]: optimal assignment maximizing total payoff
//! - [`SelfishMatching`]: optimal assignment maximizing total acceptance-probability mass
//! - [`RandomMatching`]: random complete assignment over feasible pairs only
//!
//! Every policy returns at most one triple per agent and per resource. A
//! switching set that admits no complete matching fails with
//! [`MatchingError::AssignmentInfeasible`]; no agent is silently dropped.
//!
//! # Module Structure
//!
//! - [`hungarian`] - Exact rectangular assignment solver
//! - [`feasibility`] - Bipartite maximum-matching check (petgraph)
//! - [`fair`], [`selfish`], [`random`] - The three policies

pub mod fair;
pub mod feasibility;
pub mod hungarian;
pub mod random;
pub mod selfish;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::availability::OptionSet;
use crate::error::{MatchingError, Result};
use crate::matrix::AssignmentMatrix;
use crate::stats::AdaptiveStatistics;
use crate::{AgentId, ResourceId};

pub use fair::FairMatching;
pub use random::RandomMatching;
pub use selfish::SelfishMatching;

/// Allocation policy in effect for a super-group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Policy {
    #[cfg_attr(feature = "serde", serde(rename = "fair"))]
    Fair,
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    Selfish,
    #[cfg_attr(feature = "serde", serde(rename = "rand"))]
    Random,
}

impl Policy {
    pub fn all() -> [Policy; 3] {
        [Policy::Fair, Policy::Selfish, Policy::Random]
    }

    /// The label used by the orchestrator.
    pub fn label(&self) -> &'static str {
        match self {
            Policy::Fair => "fair",
            Policy::Selfish => "self",
            Policy::Random => "rand",
        }
    }

    /// Draws a treatment arm, fair or selfish with equal odds.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Policy {
        if rng.gen_bool(0.5) {
            Policy::Fair
        } else {
            Policy::Selfish
        }
    }

    /// The algorithm implementing this policy.
    pub fn algorithm(&self) -> &'static dyn AssignmentAlgorithm {
        match self {
            Policy::Fair => &FairMatching,
            Policy::Selfish => &SelfishMatching,
            Policy::Random => &RandomMatching,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Policy {
    type Err = MatchingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "fair" => Ok(Policy::Fair),
            "self" => Ok(Policy::Selfish),
            "rand" => Ok(Policy::Random),
            other => Err(MatchingError::UnknownPolicy(other.to_string())),
        }
    }
}

/// One (agent, resource, payoff) triple of a period's result.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    pub agent: AgentId,
    pub resource: ResourceId,
    pub payoff: f64,
}

/// Algorithm that assigns every switching agent to one of its feasible resources.
pub trait AssignmentAlgorithm: Send + Sync {
    /// Solves one period.
    ///
    /// # Arguments
    ///
    /// * `options` - Non-empty option set of each switching agent
    /// * `resource_count` - Size of the resource pool
    /// * `stats` - Adaptive statistics (read by the selfish policy)
    /// * `rng` - Random source (read by the random policy)
    ///
    /// # Returns
    ///
    /// One assignment per option set, sorted by agent id.
    fn assign(
        &self,
        options: &[OptionSet],
        resource_count: usize,
        stats: &AdaptiveStatistics,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>>;

    /// Returns a human-readable name for this algorithm.
    fn name(&self) -> &str;
}

/// Assigns every switching agent under `policy`.
///
/// Fails with [`MatchingError::Unmatchable`] for the first agent whose option
/// set is empty, and with [`MatchingError::AssignmentInfeasible`] when the
/// sets cannot all be satisfied at once.
pub fn assign(
    policy: Policy,
    options: &[OptionSet],
    resource_count: usize,
    stats: &AdaptiveStatistics,
    rng: &mut dyn RngCore,
) -> Result<Vec<Assignment>> {
    if let Some(empty) = options.iter().find(|set| set.is_empty()) {
        return Err(MatchingError::Unmatchable {
            agent: empty.agent(),
        });
    }
    if options.is_empty() {
        return Ok(Vec::new());
    }

    let algorithm = policy.algorithm();
    let result = algorithm.assign(options, resource_count, stats, rng)?;
    debug!(
        policy = algorithm.name(),
        agents = options.len(),
        resources = resource_count,
        total_payoff = total_payoff(&result),
        "period assigned"
    );
    Ok(result)
}

/// Sum of payoffs in an assignment.
pub fn total_payoff(assignments: &[Assignment]) -> f64 {
    assignments.iter().map(|a| a.payoff).sum()
}

/// Solves the optimal assignment over `matrix` and reads payoffs from `options`.
///
/// Shared by the fair and selfish policies, which differ only in the matrix.
pub(crate) fn solve_optimal(
    matrix: &AssignmentMatrix,
    options: &[OptionSet],
) -> Result<Vec<Assignment>> {
    feasibility::ensure_complete(matrix)?;

    let columns = hungarian::solve(&matrix.to_costs());
    let mut result = Vec::with_capacity(options.len());
    for (row, (set, resource)) in options.iter().zip(columns).enumerate() {
        let payoff = match (matrix.cell(row, resource).is_feasible(), set.payoff(resource)) {
            (true, Some(payoff)) => payoff,
            _ => {
                return Err(MatchingError::AssignmentInfeasible {
                    agents: options.len(),
                    matched: row,
                })
            }
        };
        result.push(Assignment {
            agent: set.agent(),
            resource,
            payoff,
        });
    }

    result.sort_by_key(|a| a.agent);
    Ok(result)
}
