//! Request lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verification state of an insurance request.
///
/// The lifecycle has a single non-terminal state with two outward edges.
/// Once a terminal state is reached the status never changes again; the
/// only permitted mutation of a terminal record is attaching the rendered
/// invoice document after approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Submitted, awaiting an admin decision
    PendingVerification,
    /// Approved; invoice number and finalized premium assigned
    Approved,
    /// Rejected with a reason
    Rejected,
}

impl RequestStatus {
    /// Returns true for `APPROVED` and `REJECTED`
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    /// Checks if a transition is valid
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, target),
            (PendingVerification, Approved) | (PendingVerification, Rejected)
        )
    }

    /// Wire representation, matching the stored enum labels
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::PendingVerification => "PENDING_VERIFICATION",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING_VERIFICATION" => Ok(RequestStatus::PendingVerification),
            "APPROVED" => Ok(RequestStatus::Approved),
            "REJECTED" => Ok(RequestStatus::Rejected),
            other => Err(format!("unknown request status: {other}")),
        }
    }
}
