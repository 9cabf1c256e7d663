//! Immutable per-super-group payoff surface.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MatchingError, Result};
use crate::{AgentId, ResourceId};

/// Payoff of every (agent, resource) pair in a super-group.
///
/// Generated once when the super-group forms and never regenerated. Rows are
/// indexed by [`AgentId`], columns by [`ResourceId`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PayoffSurface {
    base: Vec<f64>,
    rows: Vec<Vec<f64>>,
    payoff_max: u32,
}

impl PayoffSurface {
    pub(super) fn new(base: Vec<f64>, rows: Vec<Vec<f64>>, payoff_max: u32) -> Self {
        Self {
            base,
            rows,
            payoff_max,
        }
    }

    /// Builds a surface from explicit rows.
    ///
    /// Every row must cover the same pool, and every value must be integral
    /// and within `[0, payoff_max]`. The base quality is taken as the column mean.
    pub fn from_rows(rows: Vec<Vec<f64>>, payoff_max: u32) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        for (agent, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MatchingError::InvalidConfig(format!(
                    "row {} has {} resources, expected {}",
                    agent,
                    row.len(),
                    width
                )));
            }
            if let Some(v) = row
                .iter()
                .find(|v| v.fract() != 0.0 || **v < 0.0 || **v > payoff_max as f64)
            {
                return Err(MatchingError::InvalidConfig(format!(
                    "payoff {} for agent {} is not an integer in [0, {}]",
                    v, agent, payoff_max
                )));
            }
        }

        let base = (0..width)
            .map(|r| rows.iter().map(|row| row[r]).sum::<f64>() / rows.len() as f64)
            .collect();
        Ok(Self::new(base, rows, payoff_max))
    }

    /// Number of agents covered.
    pub fn agent_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of resources in the pool.
    pub fn resource_count(&self) -> usize {
        self.base.len()
    }

    /// Upper bound of the payoff range.
    pub fn payoff_max(&self) -> u32 {
        self.payoff_max
    }

    /// Hidden base quality per resource, before perturbation and rounding.
    pub fn base_quality(&self) -> &[f64] {
        &self.base
    }

    /// The agent's payoff row, indexed by resource id.
    pub fn row(&self, agent: AgentId) -> Option<&[f64]> {
        self.rows.get(agent).map(Vec::as_slice)
    }

    /// Payoff of a single pair.
    pub fn payoff(&self, agent: AgentId, resource: ResourceId) -> Option<f64> {
        self.rows.get(agent)?.get(resource).copied()
    }

    /// The agent's row as a resource-to-payoff mapping.
    pub fn row_map(&self, agent: AgentId) -> Option<BTreeMap<ResourceId, f64>> {
        self.row(agent)
            .map(|row| row.iter().copied().enumerate().collect())
    }
}
