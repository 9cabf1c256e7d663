//! Distribution parameters and sampling for payoff surfaces.

use rand::Rng;
use rand_distr::{Beta, Distribution, Normal};

use super::{normalize_payoff, PayoffSurface};
use crate::config::MarketConfig;
use crate::error::{MatchingError, Result};

/// Parameters of the correlated payoff model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffModel {
    /// Upper bound of the payoff range.
    pub payoff_max: u32,
    /// Beta α of the base quality draw.
    pub base_alpha: f64,
    /// Beta β of the base quality draw.
    pub base_beta: f64,
    /// Standard deviation of each agent's perturbation.
    pub noise_sd: f64,
    /// Standard deviation of a `return` redraw.
    pub redraw_sd: f64,
}

impl PayoffModel {
    pub fn from_config(config: &MarketConfig) -> Self {
        Self {
            payoff_max: config.payoff_max,
            base_alpha: config.base_alpha,
            base_beta: config.base_beta,
            noise_sd: config.noise_sd,
            redraw_sd: config.redraw_sd,
        }
    }

    /// Draws a full surface for `agent_count` agents over `resource_count` resources.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        resource_count: usize,
        agent_count: usize,
        rng: &mut R,
    ) -> Result<PayoffSurface> {
        let beta = Beta::new(self.base_alpha, self.base_beta)
            .map_err(|e| MatchingError::InvalidConfig(format!("base quality: {e}")))?;
        let noise = gaussian(self.noise_sd)?;
        let scale = self.payoff_max as f64;

        let base: Vec<f64> = (0..resource_count)
            .map(|_| beta.sample(rng) * scale)
            .collect();

        let rows = (0..agent_count)
            .map(|_| {
                base.iter()
                    .map(|b| normalize_payoff(b + noise.sample(rng), self.payoff_max))
                    .collect()
            })
            .collect();

        Ok(PayoffSurface::new(base, rows, self.payoff_max))
    }

    /// Builds the sampler used for `return` redraws.
    pub fn redraw_sampler(&self) -> Result<Redraw> {
        Ok(Redraw {
            noise: gaussian(self.redraw_sd)?,
            payoff_max: self.payoff_max,
        })
    }
}

/// Gaussian redraw of a payoff after an agent stays put.
///
/// Built once per super-group so that sampling cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct Redraw {
    noise: Normal<f64>,
    payoff_max: u32,
}

impl Redraw {
    /// Draws around `mean`, normalized like a generated payoff.
    pub fn sample<R: Rng + ?Sized>(&self, mean: f64, rng: &mut R) -> f64 {
        normalize_payoff(mean + self.noise.sample(rng), self.payoff_max)
    }
}

impl Default for PayoffModel {
    fn default() -> Self {
        Self::from_config(&MarketConfig::default())
    }
}

fn gaussian(sd: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, sd).map_err(|e| MatchingError::InvalidConfig(format!("noise: {e}")))
}
