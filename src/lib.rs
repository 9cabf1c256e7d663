//! slotmatch - repeated two-sided matching of players to slot machines
//!
//! A fixed population of agents is repeatedly re-assigned to a fixed pool of
//! resources. An agent never revisits a resource it has left, and a resource
//! serves at most one agent per period. Each period the agents seeking
//! reassignment are matched under one of three policies:
//!
//! - [`Policy::Fair`]: welfare-maximizing optimal assignment over payoffs
//! - [`Policy::Selfish`]: optimal assignment over adaptive acceptance probabilities
//! - [`Policy::Random`]: uniformly drawn feasible assignment
//!
//! The round orchestrator (decision collection, persistence, rendering) is an
//! external caller; [`simulation::Session`] is a minimal in-process stand-in.

pub mod algorithms;
pub mod availability;
pub mod config;
pub mod error;
pub mod matrix;
pub mod payoff;
pub mod round;
pub mod simulation;
pub mod stats;

pub use algorithms::{assign, Assignment, Policy};
pub use availability::{compute_options, feasible_options, OptionSet};
pub use config::MarketConfig;
pub use error::{MatchingError, Result};
pub use payoff::{generate_surface, PayoffSurface};
pub use round::{quit_bonus, Agent, AgentStatus, Decision, SuperGroup};
pub use stats::{AdaptiveStatistics, OutcomeKind};

/// Identifier of an agent, unique within its super-group.
pub type AgentId = usize;

/// Identifier of a resource (slot machine), unique within a super-group's pool.
pub type ResourceId = usize;

/// Identifier type used for super-groups and sessions.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
