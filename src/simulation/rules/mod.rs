//! Decision rules standing in for human agents.

pub mod random;
pub mod threshold;
pub mod trait_;

pub use random::RandomRule;
pub use threshold::ThresholdRule;
pub use trait_::DecisionRule;
