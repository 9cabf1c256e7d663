use thiserror::Error;

use crate::AgentId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MatchingError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchingError {
    /// A single agent has no feasible resource this period.
    #[error("Agent {agent} has no feasible resource this period")]
    Unmatchable { agent: AgentId },

    /// The switching set as a whole admits no complete matching.
    #[error("No complete assignment exists: {agents} agents switching, at most {matched} can be matched")]
    AssignmentInfeasible { agents: usize, matched: usize },

    #[error("Unrecognized decision: {0:?}")]
    InvalidDecision(String),

    #[error("Unknown policy label: {0:?} (expected fair, self or rand)")]
    UnknownPolicy(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Round numbers start at 1, got {0}")]
    InvalidRound(u32),

    #[error("Agent {0} does not exist in this super-group")]
    UnknownAgent(AgentId),

    #[error("Agent {0} has already quit")]
    InactiveAgent(AgentId),

    #[error("No decision submitted for active agent {0}")]
    MissingDecision(AgentId),

    #[error("Agent {0} holds no resource and is not awaiting a decision")]
    NotAwaitingDecision(AgentId),
}

impl MatchingError {
    /// Returns true for failures scoped to one agent, which an orchestrator
    /// can recover from (e.g. by forcing the agent to quit).
    pub fn is_agent_scoped(&self) -> bool {
        matches!(self, MatchingError::Unmatchable { .. })
    }
}
