//! Per-round agent decisions.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MatchingError, Result};

/// What an agent does at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Decision {
    /// Keep the current resource.
    Return,
    /// Leave the current resource and be reassigned.
    Switch,
    /// Leave the market for good.
    Quit,
}

impl Decision {
    pub fn all() -> [Decision; 3] {
        [Decision::Return, Decision::Switch, Decision::Quit]
    }

    /// Numeric form code (1 = return, 2 = switch, 3 = quit).
    pub fn code(&self) -> u8 {
        match self {
            Decision::Return => 1,
            Decision::Switch => 2,
            Decision::Quit => 3,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Return => write!(f, "return"),
            Decision::Switch => write!(f, "switch"),
            Decision::Quit => write!(f, "quit"),
        }
    }
}

impl FromStr for Decision {
    type Err = MatchingError;

    /// Accepts the names and the numeric form codes.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "return" | "1" => Ok(Decision::Return),
            "switch" | "2" => Ok(Decision::Switch),
            "quit" | "3" => Ok(Decision::Quit),
            other => Err(MatchingError::InvalidDecision(other.to_string())),
        }
    }
}
