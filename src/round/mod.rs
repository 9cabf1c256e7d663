//! Round state machine.
//!
//! A [`SuperGroup`] owns its agents, its payoff surface, and the occupancy
//! they imply. Each round runs in two phases driven by the orchestrator:
//!
//! 1. [`SuperGroup::reassign`]: plan every switching agent's option set
//!    against the same occupancy snapshot, solve under the group's policy,
//!    then commit all assignments at once.
//! 2. [`SuperGroup::apply_decisions`]: apply each agent's return, switch or
//!    quit decision and advance the round counter.
//!
//! In round 1 every agent is switching because nobody holds a resource yet.

mod agent;
mod bonus;
mod decision;


pub use agent::{Agent, AgentStatus};
pub use bonus::{quit_bonus, QuitBonus};
pub use decision::Decision;

use std::collections::{BTreeMap, BTreeSet};

use rand::{Rng, RngCore};
use tracing::{info, warn};

use crate::algorithms::{assign, Assignment, Policy};
use crate::availability::{compute_options, OptionSet};
use crate::config::MarketConfig;
use crate::error::{MatchingError, Result};
use crate::payoff::{payoff_level, PayoffModel, PayoffSurface, Redraw};
use crate::stats::{AdaptiveStatistics, OutcomeKind};
use crate::{generate_id, AgentId, Id, ResourceId};

/// Effect of one round's decisions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionSummary {
    pub returned: Vec<AgentId>,
    pub switched: Vec<AgentId>,
    /// Quitting agents with the bonus each received.
    pub quit: Vec<(AgentId, f64)>,
}

/// A cohort of agents sharing one payoff surface and one allocation policy.
#[derive(Debug, Clone)]
pub struct SuperGroup {
    id: Id,
    policy: Policy,
    redraw: Redraw,
    bonus: QuitBonus,
    num_rounds: u32,
    surface: PayoffSurface,
    agents: Vec<Agent>,
    round: u32,
}

impl SuperGroup {
    /// Forms a super-group, drawing a fresh payoff surface.
    pub fn form<R: Rng + ?Sized>(config: &MarketConfig, policy: Policy, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let surface = PayoffModel::from_config(config).generate(
            config.resource_count(),
            config.agents_per_group,
            rng,
        )?;
        Self::with_surface(config, policy, surface)
    }

    /// Forms a super-group over an existing surface, one agent per row.
    ///
    /// The config is validated here so that nothing derived from it can
    /// fail once a round is under way.
    pub fn with_surface(config: &MarketConfig, policy: Policy, surface: PayoffSurface) -> Result<Self> {
        config.validate()?;
        if surface.agent_count() == 0 {
            return Err(MatchingError::InvalidConfig(
                "surface has no agents".to_string(),
            ));
        }
        if surface.resource_count() < surface.agent_count() {
            return Err(MatchingError::InvalidConfig(format!(
                "resource pool of {} cannot seat {} agents",
                surface.resource_count(),
                surface.agent_count()
            )));
        }

        let redraw = PayoffModel {
            payoff_max: surface.payoff_max(),
            ..PayoffModel::from_config(config)
        }
        .redraw_sampler()?;
        let agents = (0..surface.agent_count()).map(Agent::new).collect();
        Ok(Self {
            id: generate_id(),
            policy,
            redraw,
            bonus: QuitBonus::from_config(config),
            num_rounds: config.num_rounds,
            surface,
            agents,
            round: 1,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Current round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn surface(&self) -> &PayoffSurface {
        &self.surface
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.agents.get(id).ok_or(MatchingError::UnknownAgent(id))
    }

    pub fn active_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_active())
    }

    /// True once every round has been played or every agent has quit.
    pub fn is_finished(&self) -> bool {
        self.round > self.num_rounds || self.active_agents().next().is_none()
    }

    /// Resources held by active agents that are not switching away.
    pub fn occupied(&self) -> BTreeSet<ResourceId> {
        self.active_agents()
            .filter(|a| a.status() != AgentStatus::Switching)
            .filter_map(Agent::resource)
            .collect()
    }

    /// Agents that need a resource this period.
    pub fn switching_agents(&self) -> Vec<AgentId> {
        self.active_agents()
            .filter(|a| a.status() == AgentStatus::Switching)
            .map(Agent::id)
            .collect()
    }

    /// Computes every switching agent's option set against one occupancy snapshot.
    ///
    /// Fails with [`MatchingError::Unmatchable`] for the first agent left
    /// without options.
    pub fn plan(&self) -> Result<Vec<OptionSet>> {
        let occupied = self.occupied();
        self.active_agents()
            .filter(|a| a.status() == AgentStatus::Switching)
            .map(|a| compute_options(a, &occupied, &self.surface)?.require_nonempty())
            .collect()
    }

    /// Runs this period's matching and commits the result.
    ///
    /// Returning agents keep their resources; switching agents receive new
    /// ones. Each new assignment is recorded as accepted in `stats`.
    pub fn reassign(
        &mut self,
        stats: &mut AdaptiveStatistics,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Assignment>> {
        let options = self.plan()?;
        let assignments = assign(
            self.policy,
            &options,
            self.surface.resource_count(),
            stats,
            rng,
        )?;

        for a in &assignments {
            self.agents[a.agent].commit_assignment(a.resource, a.payoff);
            stats.record(payoff_level(a.payoff), OutcomeKind::Accepted);
        }
        for agent in &mut self.agents {
            if agent.status() == AgentStatus::Returning {
                agent.set_status(AgentStatus::Pending);
            }
        }

        info!(
            group = %self.id,
            policy = %self.policy,
            round = self.round,
            assigned = assignments.len(),
            "period reassigned"
        );
        Ok(assignments)
    }

    /// Applies end-of-round decisions and advances to the next round.
    ///
    /// Every active agent awaiting a decision must have exactly one entry;
    /// the whole batch is validated before any agent changes state.
    pub fn apply_decisions(
        &mut self,
        decisions: &BTreeMap<AgentId, Decision>,
        stats: &mut AdaptiveStatistics,
        rng: &mut dyn RngCore,
    ) -> Result<DecisionSummary> {
        for &id in decisions.keys() {
            let agent = self.agent(id)?;
            if !agent.is_active() {
                return Err(MatchingError::InactiveAgent(id));
            }
            if agent.status() != AgentStatus::Pending || agent.resource().is_none() {
                return Err(MatchingError::NotAwaitingDecision(id));
            }
        }
        if let Some(missing) = self
            .active_agents()
            .find(|a| a.status() == AgentStatus::Pending && !decisions.contains_key(&a.id()))
        {
            return Err(MatchingError::MissingDecision(missing.id()));
        }

        let bonus = self.bonus.amount(self.round)?;
        let mut summary = DecisionSummary::default();
        for (&id, &decision) in decisions {
            match decision {
                Decision::Return => {
                    self.keep(id, rng);
                    summary.returned.push(id);
                }
                Decision::Switch => {
                    let agent = &mut self.agents[id];
                    stats.record(payoff_level(agent.payoff()), OutcomeKind::SwitchedAway);
                    agent.release();
                    agent.set_status(AgentStatus::Switching);
                    summary.switched.push(id);
                }
                Decision::Quit => {
                    self.agents[id].deactivate(bonus);
                    summary.quit.push((id, bonus));
                }
            }
        }

        info!(
            group = %self.id,
            round = self.round,
            returned = summary.returned.len(),
            switched = summary.switched.len(),
            quit = summary.quit.len(),
            "decisions applied"
        );
        self.round += 1;
        Ok(summary)
    }

    /// Deactivates an agent the orchestrator cannot place, paying the
    /// current round's exit bonus.
    pub fn force_quit(&mut self, id: AgentId) -> Result<f64> {
        if !self.agent(id)?.is_active() {
            return Err(MatchingError::InactiveAgent(id));
        }
        let bonus = self.bonus.amount(self.round)?;
        self.agents[id].deactivate(bonus);
        warn!(group = %self.id, agent = id, round = self.round, bonus, "agent forced to quit");
        Ok(bonus)
    }

    /// Banks the current payoff and redraws it around the held resource's
    /// base quality. Callers have checked that the agent holds a resource.
    fn keep(&mut self, id: AgentId, rng: &mut dyn RngCore) {
        let agent = &mut self.agents[id];
        let mean = agent
            .resource()
            .and_then(|r| self.surface.base_quality().get(r).copied())
            .unwrap_or(agent.payoff());
        let redrawn = self.redraw.sample(mean, rng);

        agent.bank(agent.payoff());
        agent.set_payoff(redrawn);
        agent.set_status(AgentStatus::Returning);
    }
}
