//! Configuration for a matching market session.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MatchingError, Result};

/// Tunable constants for payoff generation, adaptive statistics, and the
/// round state machine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarketConfig {
    // --- Population ---
    /// Number of agents in each super-group.
    pub agents_per_group: usize,
    /// Number of rounds played per session.
    pub num_rounds: u32,
    /// Size of the resource pool. `None` derives `agents_per_group + num_rounds`.
    pub resource_count: Option<usize>,

    // --- Payoff surface ---
    /// Upper bound of the closed payoff range `[0, payoff_max]`.
    pub payoff_max: u32,
    /// Beta α for the base quality draw.
    pub base_alpha: f64,
    /// Beta β for the base quality draw (β > α skews right).
    pub base_beta: f64,
    /// Standard deviation of the per-agent perturbation.
    pub noise_sd: f64,
    /// Standard deviation of the payoff redraw after a `return` decision.
    pub redraw_sd: f64,

    // --- Adaptive statistics ---
    /// Shrinkage constant k: prior weight is `k / (k + accepted)`.
    pub prior_weight: f64,

    // --- Quit bonus ---
    /// Exit bonus paid for quitting in round 1.
    pub initial_bonus: f64,
    /// Amount the exit bonus declines per round.
    pub bonus_decrement: f64,
}

impl MarketConfig {
    /// Returns the size of the resource pool.
    pub fn resource_count(&self) -> usize {
        self.resource_count
            .unwrap_or(self.agents_per_group + self.num_rounds as usize)
    }

    /// Checks that the configuration describes a playable market.
    pub fn validate(&self) -> Result<()> {
        if self.agents_per_group == 0 {
            return Err(invalid("agents_per_group must be at least 1"));
        }
        if self.num_rounds == 0 {
            return Err(invalid("num_rounds must be at least 1"));
        }
        if self.resource_count() < self.agents_per_group {
            return Err(invalid(format!(
                "resource pool of {} cannot seat {} agents",
                self.resource_count(),
                self.agents_per_group
            )));
        }
        if self.payoff_max == 0 {
            return Err(invalid("payoff_max must be positive"));
        }
        if !(self.base_alpha > 0.0 && self.base_beta > 0.0) {
            return Err(invalid("beta parameters must be positive"));
        }
        if !(self.noise_sd > 0.0 && self.redraw_sd > 0.0) {
            return Err(invalid("standard deviations must be positive"));
        }
        if !(self.prior_weight > 0.0) {
            return Err(invalid("prior_weight must be positive"));
        }
        if self.initial_bonus < 0.0 || self.bonus_decrement < 0.0 {
            return Err(invalid("quit bonus parameters must be non-negative"));
        }
        let last = self.initial_bonus - self.bonus_decrement * (self.num_rounds - 1) as f64;
        if last < 0.0 {
            return Err(invalid(format!(
                "quit bonus would be {} in round {}",
                last, self.num_rounds
            )));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> MatchingError {
    MatchingError::InvalidConfig(msg.into())
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            agents_per_group: 3,
            num_rounds: 2,
            resource_count: None,
            payoff_max: 20,
            base_alpha: 1.0,
            base_beta: 2.0,
            noise_sd: 3.0,
            redraw_sd: 3.0,
            prior_weight: 5.0,
            initial_bonus: 70.0,
            bonus_decrement: 7.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MarketConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.resource_count(), 5);
    }

    #[test]
    fn explicit_pool_overrides_derived() {
        let cfg = MarketConfig {
            resource_count: Some(12),
            ..MarketConfig::default()
        };
        assert_eq!(cfg.resource_count(), 12);
    }

    #[test]
    fn pool_smaller_than_group_rejected() {
        let cfg = MarketConfig {
            resource_count: Some(2),
            ..MarketConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(MatchingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn negative_final_bonus_rejected() {
        let cfg = MarketConfig {
            num_rounds: 12,
            ..MarketConfig::default()
        };
        // 70 - 7 * 11 = -7
        assert!(cfg.validate().is_err());

        let ok = MarketConfig {
            num_rounds: 11,
            ..MarketConfig::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn non_positive_noise_rejected() {
        let cfg = MarketConfig {
            noise_sd: 0.0,
            ..MarketConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
