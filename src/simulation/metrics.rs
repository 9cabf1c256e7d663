//! Session-level outcome metrics, aggregated per policy.

use std::fmt;

use crate::algorithms::Policy;
use crate::round::SuperGroup;

/// Running event counts for one super-group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupTally {
    /// Assignments made across all periods.
    pub assignments: usize,
    /// Sum of payoffs at assignment time.
    pub assigned_payoff: f64,
    pub switches: usize,
    pub quits: usize,
    /// Agents deactivated because they had no feasible resource.
    pub forced_quits: usize,
}

/// Aggregated outcome of the groups sharing one policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyMetrics {
    pub policy: Policy,
    pub groups: usize,
    pub agents: usize,
    /// Mean banked earnings per agent, exit bonuses included.
    pub mean_earnings: f64,
    /// Mean payoff per assignment.
    pub mean_assigned_payoff: f64,
    pub assignments: usize,
    pub switches: usize,
    pub quits: usize,
    pub forced_quits: usize,
}

/// Aggregated session metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetrics {
    /// Rounds played by the longest-running group.
    pub rounds_played: u32,
    /// One entry per policy in use, in `fair`, `self`, `rand` order.
    pub by_policy: Vec<PolicyMetrics>,
}

impl SessionMetrics {
    /// Aggregates `groups` with their matching `tallies`.
    pub fn collect(groups: &[SuperGroup], tallies: &[GroupTally]) -> Self {
        let rounds_played = groups
            .iter()
            .map(|g| g.round().saturating_sub(1))
            .max()
            .unwrap_or(0);

        let by_policy = Policy::all()
            .into_iter()
            .filter_map(|policy| {
                let members: Vec<(&SuperGroup, &GroupTally)> = groups
                    .iter()
                    .zip(tallies)
                    .filter(|&(g, _)| g.policy() == policy)
                    .collect();
                if members.is_empty() {
                    return None;
                }

                let agents: usize = members.iter().map(|&(g, _)| g.agents().len()).sum();
                let earnings: f64 = members
                    .iter()
                    .flat_map(|&(g, _)| g.agents().iter().map(|a| a.earnings()))
                    .sum();
                let assignments: usize = members.iter().map(|&(_, t)| t.assignments).sum();
                let assigned_payoff: f64 = members.iter().map(|&(_, t)| t.assigned_payoff).sum();

                Some(PolicyMetrics {
                    policy,
                    groups: members.len(),
                    agents,
                    mean_earnings: ratio(earnings, agents),
                    mean_assigned_payoff: ratio(assigned_payoff, assignments),
                    assignments,
                    switches: members.iter().map(|&(_, t)| t.switches).sum(),
                    quits: members.iter().map(|&(_, t)| t.quits).sum(),
                    forced_quits: members.iter().map(|&(_, t)| t.forced_quits).sum(),
                })
            })
            .collect();

        Self {
            rounds_played,
            by_policy,
        }
    }

    pub fn for_policy(&self, policy: Policy) -> Option<&PolicyMetrics> {
        self.by_policy.iter().find(|m| m.policy == policy)
    }
}

fn ratio(total: f64, count: usize) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

impl fmt::Display for SessionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Session Metrics ({} rounds) ===",
            self.rounds_played
        )?;
        for m in &self.by_policy {
            writeln!(f, "  [{}] {} groups, {} agents", m.policy, m.groups, m.agents)?;
            writeln!(f, "    Mean earnings:         {:.2}", m.mean_earnings)?;
            writeln!(
                f,
                "    Mean assigned payoff:  {:.2} over {} assignments",
                m.mean_assigned_payoff, m.assignments
            )?;
            writeln!(f, "    Switches:              {}", m.switches)?;
            writeln!(
                f,
                "    Quits:                 {} ({} forced)",
                m.quits + m.forced_quits,
                m.forced_quits
            )?;
        }
        Ok(())
    }
}
