//! Per-agent feasible option sets.
//!
//! A switching agent may take any resource that is neither occupied by
//! another agent this period nor in its own exclusion set. A returning agent
//! is pinned to the resource it already holds.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MatchingError, Result};
use crate::payoff::PayoffSurface;
use crate::round::{Agent, AgentStatus};
use crate::{AgentId, ResourceId};

/// The resources one agent may be assigned this period, with its payoff for each.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
    agent: AgentId,
    options: BTreeMap<ResourceId, f64>,
}

impl OptionSet {
    pub fn new(agent: AgentId, options: BTreeMap<ResourceId, f64>) -> Self {
        Self { agent, options }
    }

    /// An option set holding exactly one resource.
    pub fn singleton(agent: AgentId, resource: ResourceId, payoff: f64) -> Self {
        Self::new(agent, BTreeMap::from([(resource, payoff)]))
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn options(&self) -> &BTreeMap<ResourceId, f64> {
        &self.options
    }

    pub fn payoff(&self, resource: ResourceId) -> Option<f64> {
        self.options.get(&resource).copied()
    }

    pub fn contains(&self, resource: ResourceId) -> bool {
        self.options.contains_key(&resource)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.options.keys().copied()
    }

    /// Fails with [`MatchingError::Unmatchable`] when the set is empty.
    pub fn require_nonempty(self) -> Result<Self> {
        if self.is_empty() {
            Err(MatchingError::Unmatchable { agent: self.agent })
        } else {
            Ok(self)
        }
    }
}

/// Restricts an agent's payoff row to resources outside `occupied ∪ excluded`.
pub fn feasible_options(
    agent: AgentId,
    row: &[f64],
    occupied: &BTreeSet<ResourceId>,
    excluded: &BTreeSet<ResourceId>,
) -> OptionSet {
    let options = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(r, _)| !occupied.contains(r) && !excluded.contains(r))
        .collect();
    OptionSet::new(agent, options)
}

/// Computes the option set of an active agent for the current period.
///
/// A returning agent that holds a resource gets a singleton of that resource
/// and its current payoff; the exclusion check does not apply to it. Any
/// other active agent gets its filtered surface row, which may be empty.
pub fn compute_options(
    agent: &Agent,
    occupied: &BTreeSet<ResourceId>,
    surface: &PayoffSurface,
) -> Result<OptionSet> {
    if !agent.is_active() {
        return Err(MatchingError::InactiveAgent(agent.id()));
    }

    if agent.status() == AgentStatus::Returning {
        if let Some(resource) = agent.resource() {
            return Ok(OptionSet::singleton(agent.id(), resource, agent.payoff()));
        }
    }

    let row = surface
        .row(agent.id())
        .ok_or(MatchingError::UnknownAgent(agent.id()))?;
    Ok(feasible_options(agent.id(), row, occupied, agent.exclusions()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[ResourceId]) -> BTreeSet<ResourceId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn filters_occupied_and_excluded() {
        let row = [5.0, 6.0, 7.0, 8.0, 9.0];
        let opts = feasible_options(0, &row, &set(&[1]), &set(&[3]));
        let got: Vec<_> = opts.resources().collect();
        assert_eq!(got, vec![0, 2, 4]);
        assert_eq!(opts.payoff(4), Some(9.0));
    }

    #[test]
    fn empty_when_everything_blocked() {
        let row = [5.0, 6.0];
        let opts = feasible_options(1, &row, &set(&[0]), &set(&[1]));
        assert!(opts.is_empty());
        assert_eq!(
            opts.require_nonempty(),
            Err(MatchingError::Unmatchable { agent: 1 })
        );
    }

    #[test]
    fn only_option_excluded_is_unmatchable() {
        let surface = PayoffSurface::from_rows(vec![vec![4.0, 6.0]], 20).unwrap();
        let mut agent = Agent::new(0);
        agent.commit_assignment(1, 6.0);
        agent.set_status(AgentStatus::Switching);
        agent.release();

        // Resource 0 is taken by someone else, resource 1 was visited before.
        let opts = compute_options(&agent, &set(&[0]), &surface).unwrap();
        assert!(opts.is_empty());
        assert_eq!(
            opts.require_nonempty(),
            Err(MatchingError::Unmatchable { agent: 0 })
        );
    }

    #[test]
    fn returning_agent_is_pinned() {
        let surface = PayoffSurface::from_rows(vec![vec![4.0, 6.0, 1.0]], 20).unwrap();
        let mut agent = Agent::new(0);
        agent.commit_assignment(1, 6.0);
        agent.set_status(AgentStatus::Returning);

        // The held resource is both occupied and excluded, yet still feasible.
        let opts = compute_options(&agent, &set(&[1]), &surface).unwrap();
        assert_eq!(opts, OptionSet::singleton(0, 1, 6.0));
    }

    #[test]
    fn inactive_agent_rejected() {
        let surface = PayoffSurface::from_rows(vec![vec![4.0]], 20).unwrap();
        let mut agent = Agent::new(0);
        agent.deactivate(0.0);
        assert_eq!(
            compute_options(&agent, &BTreeSet::new(), &surface),
            Err(MatchingError::InactiveAgent(0))
        );
    }
}
