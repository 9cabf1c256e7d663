//! Declining exit bonus.

use crate::config::MarketConfig;
use crate::error::{MatchingError, Result};

/// Bonus paid once to an agent who quits: `initial - decrement × (round - 1)`,
/// never below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuitBonus {
    pub initial: f64,
    pub decrement: f64,
}

impl QuitBonus {
    pub fn new(initial: f64, decrement: f64) -> Self {
        Self { initial, decrement }
    }

    pub fn from_config(config: &MarketConfig) -> Self {
        Self::new(config.initial_bonus, config.bonus_decrement)
    }

    /// Bonus for quitting in `round` (1-based).
    pub fn amount(&self, round: u32) -> Result<f64> {
        if round == 0 {
            return Err(MatchingError::InvalidRound(round));
        }
        let raw = self.initial - self.decrement * (round - 1) as f64;
        Ok(raw.max(0.0))
    }
}

/// Bonus for quitting in `round` under `config`.
pub fn quit_bonus(round: u32, config: &MarketConfig) -> Result<f64> {
    QuitBonus::from_config(config).amount(round)
}
