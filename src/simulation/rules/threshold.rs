//! Payoff-threshold rule.

use super::trait_::DecisionRule;
use crate::round::{Agent, Decision};

/// Keeps good machines, leaves poor ones, and walks away from bad ones.
///
/// - payoff `< quit_below`: quit
/// - payoff `>= keep_at`: return
/// - otherwise: switch
pub struct ThresholdRule {
    keep_at: f64,
    quit_below: f64,
}

impl ThresholdRule {
    pub fn new(keep_at: f64, quit_below: f64) -> Self {
        Self {
            keep_at,
            quit_below,
        }
    }
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self::new(10.0, 2.0)
    }
}

impl DecisionRule for ThresholdRule {
    fn decide(&mut self, agent: &Agent, _round: u32) -> Decision {
        let payoff = agent.payoff();
        if payoff < self.quit_below {
            Decision::Quit
        } else if payoff >= self.keep_at {
            Decision::Return
        } else {
            Decision::Switch
        }
    }

    fn name(&self) -> &str {
        "threshold"
    }
}
