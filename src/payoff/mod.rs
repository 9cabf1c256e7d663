//! Payoff generation.
//!
//! Each super-group gets one correlated payoff surface: a hidden base quality
//! per resource, shared by every agent, plus an independent Gaussian
//! perturbation per (agent, resource) pair. Agents broadly agree on which
//! machines are good but disagree at the margin.
//!
//! Values are floored and clipped into `[0, payoff_max]`, so every payoff is
//! integral and in range. Mass beyond the bounds is folded onto the bounds.

mod model;
mod surface;

pub use model::{PayoffModel, Redraw};
pub use surface::PayoffSurface;

use rand::Rng;

use crate::config::MarketConfig;
use crate::error::Result;

/// Default upper bound of the payoff range.
pub const DEFAULT_PAYOFF_MAX: u32 = 20;

/// Generates a surface with the default model parameters.
pub fn generate_surface<R: Rng + ?Sized>(
    resource_count: usize,
    agent_count: usize,
    rng: &mut R,
) -> Result<PayoffSurface> {
    PayoffModel::from_config(&MarketConfig::default()).generate(resource_count, agent_count, rng)
}

/// Floors `value` and clips it into `[0, max]`.
pub fn normalize_payoff(value: f64, max: u32) -> f64 {
    value.floor().clamp(0.0, max as f64)
}

/// Discrete level of a payoff, used to key adaptive statistics.
pub fn payoff_level(value: f64) -> u32 {
    value.max(0.0).floor() as u32
}
