//! Agent state owned by the round state machine.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AgentId, ResourceId};

/// Lifecycle status of an agent.
///
/// `Switching` and `Returning` are entered from `Pending` by a decision.
/// `Quit` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentStatus {
    /// Holds a resource and awaits this round's decision.
    Pending,
    /// Seeks a new resource next period.
    Switching,
    /// Keeps its resource next period.
    Returning,
    /// Permanently inactive.
    Quit,
}

/// A player in a super-group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Agent {
    id: AgentId,
    status: AgentStatus,
    resource: Option<ResourceId>,
    payoff: f64,
    exclusions: BTreeSet<ResourceId>,
    earnings: f64,
}

impl Agent {
    /// Creates an agent seeking its first resource.
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            status: AgentStatus::Switching,
            resource: None,
            payoff: 0.0,
            exclusions: BTreeSet::new(),
            earnings: 0.0,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status != AgentStatus::Quit
    }

    /// Resource currently held, if any.
    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }

    /// Payoff of the currently held resource.
    pub fn payoff(&self) -> f64 {
        self.payoff
    }

    /// Every resource this agent has ever been assigned. Never shrinks.
    pub fn exclusions(&self) -> &BTreeSet<ResourceId> {
        &self.exclusions
    }

    /// Payoffs banked so far, including any exit bonus.
    pub fn earnings(&self) -> f64 {
        self.earnings
    }

    pub(crate) fn set_status(&mut self, status: AgentStatus) {
        if self.is_active() {
            self.status = status;
        }
    }

    /// Takes a newly assigned resource and awaits a decision.
    pub(crate) fn commit_assignment(&mut self, resource: ResourceId, payoff: f64) {
        self.resource = Some(resource);
        self.payoff = payoff;
        self.exclusions.insert(resource);
        self.set_status(AgentStatus::Pending);
    }

    pub(crate) fn release(&mut self) {
        self.resource = None;
    }

    pub(crate) fn set_payoff(&mut self, payoff: f64) {
        self.payoff = payoff;
    }

    pub(crate) fn bank(&mut self, amount: f64) {
        self.earnings += amount;
    }

    /// Quits permanently, banking `bonus`.
    pub(crate) fn deactivate(&mut self, bonus: f64) {
        self.release();
        self.bank(bonus);
        self.status = AgentStatus::Quit;
    }
}
