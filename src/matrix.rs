//! Assignment problem matrices.
//!
//! Each period the switching agents' option sets are assembled into an
//! agent-major matrix over the whole resource pool. A cell is either
//! [`Cell::Feasible`] with the value the optimizer maximizes, or
//! [`Cell::Infeasible`]. The sentinel used internally by the solver never
//! leaves this module.

use crate::availability::OptionSet;
use crate::payoff::payoff_level;
use crate::stats::AdaptiveStatistics;
use crate::{AgentId, ResourceId};

/// Cost assigned to infeasible cells when lowering to a minimization problem.
///
/// Larger than any achievable total of real costs, so an optimum never uses
/// one when a complete feasible assignment exists.
const INFEASIBLE_COST: f64 = 1.0e9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Feasible(f64),
    Infeasible,
}

impl Cell {
    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Feasible(v) => Some(*v),
            Cell::Infeasible => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Cell::Feasible(_))
    }
}

/// Dense (agent × resource) matrix for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentMatrix {
    agents: Vec<AgentId>,
    resource_count: usize,
    cells: Vec<Vec<Cell>>,
}

impl AssignmentMatrix {
    /// Payoff mode: a feasible cell holds the agent's payoff for the resource.
    pub fn payoffs(options: &[OptionSet], resource_count: usize) -> Self {
        Self::build(options, resource_count, |payoff| payoff)
    }

    /// Probability mode: a feasible cell holds `p / (1 + p)` where `p` is the
    /// adaptive estimate for the cell's payoff level.
    pub fn probabilities(
        options: &[OptionSet],
        resource_count: usize,
        stats: &AdaptiveStatistics,
    ) -> Self {
        Self::build(options, resource_count, |payoff| {
            let p = stats.estimate(payoff_level(payoff));
            p / (1.0 + p)
        })
    }

    fn build(options: &[OptionSet], resource_count: usize, weight: impl Fn(f64) -> f64) -> Self {
        let agents = options.iter().map(OptionSet::agent).collect();
        let cells = options
            .iter()
            .map(|set| {
                let mut row = vec![Cell::Infeasible; resource_count];
                for (&resource, &payoff) in set.options() {
                    if let Some(cell) = row.get_mut(resource) {
                        *cell = Cell::Feasible(weight(payoff));
                    }
                }
                row
            })
            .collect();

        Self {
            agents,
            resource_count,
            cells,
        }
    }

    /// Agent id of each row, in row order.
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resource_count
    }

    pub fn cell(&self, row: usize, resource: ResourceId) -> Cell {
        self.cells
            .get(row)
            .and_then(|r| r.get(resource))
            .copied()
            .unwrap_or(Cell::Infeasible)
    }

    /// Feasible resources of each row, for bipartite feasibility checks.
    pub fn feasible_columns(&self) -> Vec<Vec<ResourceId>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_feasible())
                    .map(|(r, _)| r)
                    .collect()
            })
            .collect()
    }

    /// Lowers the matrix to a minimization cost matrix (negated values).
    pub(crate) fn to_costs(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::Feasible(v) => -v,
                        Cell::Infeasible => INFEASIBLE_COST,
                    })
                    .collect()
            })
            .collect()
    }
}
