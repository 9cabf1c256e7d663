//! In-process session driver.
//!
//! Stands in for the external round orchestrator: it forms super-groups,
//! feeds them decisions from a [`DecisionRule`], recovers from unmatchable
//! agents by forcing them to quit, and aggregates [`SessionMetrics`].

pub mod metrics;
pub mod rules;

pub use metrics::{GroupTally, PolicyMetrics, SessionMetrics};
pub use rules::{DecisionRule, RandomRule, ThresholdRule};

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::algorithms::{total_payoff, Policy};
use crate::config::MarketConfig;
use crate::error::{MatchingError, Result};
use crate::round::{AgentStatus, Decision, SuperGroup};
use crate::stats::AdaptiveStatistics;
use crate::{generate_id, AgentId, Id};

/// A session of super-groups sharing one set of adaptive statistics.
///
/// # Lifecycle
///
/// 1. Call [`Session::new`] with configuration and seed.
/// 2. Add super-groups with [`Session::add_group`] or [`Session::add_sampled_group`].
/// 3. Call [`Session::run`] with a decision rule.
#[derive(Debug)]
pub struct Session {
    config: MarketConfig,
    id: Id,
    groups: Vec<SuperGroup>,
    tallies: Vec<GroupTally>,
    stats: AdaptiveStatistics,
    rng: StdRng,
}

impl Session {
    pub fn new(config: MarketConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let stats = AdaptiveStatistics::new(config.payoff_max, config.prior_weight);
        Ok(Self {
            config,
            id: generate_id(),
            groups: Vec::new(),
            tallies: Vec::new(),
            stats,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn groups(&self) -> &[SuperGroup] {
        &self.groups
    }

    pub fn stats(&self) -> &AdaptiveStatistics {
        &self.stats
    }

    /// Forms a super-group under `policy` with a freshly drawn surface.
    pub fn add_group(&mut self, policy: Policy) -> Result<&SuperGroup> {
        let group = SuperGroup::form(&self.config, policy, &mut self.rng)?;
        self.groups.push(group);
        self.tallies.push(GroupTally::default());
        Ok(&self.groups[self.groups.len() - 1])
    }

    /// Forms a super-group under a randomly drawn treatment arm.
    pub fn add_sampled_group(&mut self) -> Result<&SuperGroup> {
        let policy = Policy::sample(&mut self.rng);
        self.add_group(policy)
    }

    /// Plays every group to completion and returns the aggregated metrics.
    pub fn run(&mut self, rule: &mut dyn DecisionRule) -> Result<SessionMetrics> {
        while self.groups.iter().any(|g| !g.is_finished()) {
            for index in 0..self.groups.len() {
                if !self.groups[index].is_finished() {
                    self.play_round(index, rule)?;
                }
            }
        }

        let metrics = SessionMetrics::collect(&self.groups, &self.tallies);
        info!(
            session = %self.id,
            rule = rule.name(),
            groups = self.groups.len(),
            rounds = metrics.rounds_played,
            "session finished"
        );
        Ok(metrics)
    }

    /// Plays one round of one group: reassignment, then decisions.
    pub fn play_round(&mut self, index: usize, rule: &mut dyn DecisionRule) -> Result<()> {
        let Session {
            groups,
            tallies,
            stats,
            rng,
            ..
        } = self;
        let group = &mut groups[index];
        let tally = &mut tallies[index];

        let assignments = loop {
            match group.reassign(stats, &mut *rng) {
                Ok(assignments) => break assignments,
                Err(MatchingError::Unmatchable { agent }) => {
                    group.force_quit(agent)?;
                    tally.forced_quits += 1;
                }
                Err(e) => return Err(e),
            }
        };
        tally.assignments += assignments.len();
        tally.assigned_payoff += total_payoff(&assignments);

        let round = group.round();
        let decisions: BTreeMap<AgentId, Decision> = group
            .active_agents()
            .filter(|a| a.status() == AgentStatus::Pending)
            .map(|a| (a.id(), rule.decide(a, round)))
            .collect();
        let summary = group.apply_decisions(&decisions, stats, rng)?;
        tally.switches += summary.switched.len();
        tally.quits += summary.quit.len();
        Ok(())
    }
}
