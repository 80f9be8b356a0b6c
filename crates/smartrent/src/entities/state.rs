//! Alert status state machine.
//!
//! Each status maps to a static [`AlertState`] entry describing which
//! statuses may follow it. The table carries no per-alert data, so the
//! entity looks its entry up from `status` on every call instead of caching
//! a state object.

use super::alert::AlertStatus;
use crate::errors::{SmartRentError, SmartRentResult};

/// Transition policy for one status
#[derive(Debug, PartialEq, Eq)]
pub struct AlertState {
    status: AlertStatus,
    transitions: &'static [AlertStatus],
    description: &'static str,
}

static PENDING: AlertState = AlertState {
    status: AlertStatus::Pending,
    transitions: &[AlertStatus::InProgress, AlertStatus::Cancelled],
    description: "Reported and waiting for an administrator to start work",
};

static IN_PROGRESS: AlertState = AlertState {
    status: AlertStatus::InProgress,
    transitions: &[AlertStatus::Resolved, AlertStatus::Cancelled],
    description: "Staff is working on the issue",
};

static RESOLVED: AlertState = AlertState {
    status: AlertStatus::Resolved,
    transitions: &[],
    description: "The issue has been fixed",
};

static CANCELLED: AlertState = AlertState {
    status: AlertStatus::Cancelled,
    transitions: &[],
    description: "The report was withdrawn or rejected",
};

impl AlertState {
    /// Look up the policy for a status
    pub fn of(status: AlertStatus) -> &'static AlertState {
        match status {
            AlertStatus::Pending => &PENDING,
            AlertStatus::InProgress => &IN_PROGRESS,
            AlertStatus::Resolved => &RESOLVED,
            AlertStatus::Cancelled => &CANCELLED,
        }
    }

    /// Status this policy belongs to
    pub fn status(&self) -> AlertStatus {
        self.status
    }

    /// Statuses reachable in one step
    pub fn valid_transitions(&self) -> &'static [AlertStatus] {
        self.transitions
    }

    pub fn can_transition_to(&self, target: AlertStatus) -> bool {
        self.transitions.contains(&target)
    }

    /// No further transitions are possible
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Human-readable meaning of the status
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Validate a move to `target`, returning the status to apply
    pub fn transition(&self, target: AlertStatus) -> SmartRentResult<AlertStatus> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(SmartRentError::InvalidTransition {
                from: self.status,
                to: target,
                valid: self.transitions.to_vec(),
            })
        }
    }
}
