//! Decision rule trait for simulated sessions.

use crate::round::{Agent, Decision};

/// Chooses an end-of-round decision for an agent holding a resource.
pub trait DecisionRule {
    /// Decides for one agent.
    ///
    /// # Arguments
    ///
    /// * `agent` - An active agent awaiting its decision
    /// * `round` - The round just played (1-based)
    fn decide(&mut self, agent: &Agent, round: u32) -> Decision;

    /// Returns a human-readable name for this rule.
    fn name(&self) -> &str;
}
