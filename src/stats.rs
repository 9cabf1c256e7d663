//! Adaptive per-payoff-level statistics feeding the selfish policy.
//!
//! For each discrete payoff level the tracker counts how often an agent
//! switched away from a resource paying that level and how often an agent was
//! newly assigned to one. The acceptance-probability estimate for a level
//! starts at a concave prior `4x(1 - x)` over the normalized level and shrinks
//! toward the empirical ratio `switched_away / accepted` as observations
//! accumulate, with prior weight `k / (k + accepted)`.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of event recorded against a payoff level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutcomeKind {
    /// An agent left a resource paying this level.
    SwitchedAway,
    /// An agent was newly assigned to a resource paying this level.
    Accepted,
}

/// Monotonic counters for one payoff level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelCounts {
    pub switched_away: u64,
    pub accepted: u64,
}

/// Running counters, owned by the session and passed into each period.
///
/// Counters only ever grow; nothing resets them within a session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdaptiveStatistics {
    levels: BTreeMap<u32, LevelCounts>,
    max_level: u32,
    prior_weight: f64,
}

impl AdaptiveStatistics {
    /// Creates an empty tracker.
    ///
    /// # Arguments
    ///
    /// * `max_level` - Highest payoff level, used to normalize the prior
    /// * `prior_weight` - Shrinkage constant k
    pub fn new(max_level: u32, prior_weight: f64) -> Self {
        Self {
            levels: BTreeMap::new(),
            max_level: max_level.max(1),
            prior_weight,
        }
    }

    pub fn record(&mut self, level: u32, kind: OutcomeKind) {
        let counts = self.levels.entry(level).or_default();
        match kind {
            OutcomeKind::SwitchedAway => counts.switched_away += 1,
            OutcomeKind::Accepted => counts.accepted += 1,
        }
    }

    pub fn counts(&self, level: u32) -> LevelCounts {
        self.levels.get(&level).copied().unwrap_or_default()
    }

    /// Iterates over every level with at least one observation.
    pub fn iter(&self) -> impl Iterator<Item = (u32, LevelCounts)> + '_ {
        self.levels.iter().map(|(l, c)| (*l, *c))
    }

    /// Prior estimate for `level`: `4x(1 - x)` with `x = level / max_level`.
    pub fn prior(&self, level: u32) -> f64 {
        let x = (level as f64 / self.max_level as f64).clamp(0.0, 1.0);
        4.0 * x * (1.0 - x)
    }

    /// Blended estimate for `level`.
    ///
    /// Equals [`prior`](Self::prior) exactly while `accepted` is zero.
    pub fn estimate(&self, level: u32) -> f64 {
        let prior = self.prior(level);
        let counts = self.counts(level);
        if counts.accepted == 0 {
            return prior;
        }
        let accepted = counts.accepted as f64;
        let empirical = counts.switched_away as f64 / accepted;
        let w = self.prior_weight / (self.prior_weight + accepted);
        w * prior + (1.0 - w) * empirical
    }
}
