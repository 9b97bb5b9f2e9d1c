//! App-request lifecycle primitives: status values and validated reasons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a domain value fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is shorter than the minimum length.
    #[error("value must be at least {min} characters (got {got})")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
        /// Actual length.
        got: usize,
    },
    /// The value exceeds the maximum length.
    #[error("value exceeds maximum length of {max} characters (got {got})")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
        /// Actual length.
        got: usize,
    },
    /// The status string is not one of the known statuses.
    #[error("unknown request status: {0}")]
    UnknownStatus(String),
}

/// Lifecycle status of an app request. `Pending` is the only state with
/// outgoing transitions; the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Granted by an admin.
    Approved,
    /// Declined by an admin.
    Rejected,
}

impl RequestStatus {
    /// Wire and database representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether no further transition is permitted out of this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request justification (10–2000 characters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestReason(String);

impl RequestReason {
    /// Minimum accepted length.
    pub const MIN: usize = 10;
    /// Maximum accepted length.
    pub const MAX: usize = 2000;

    /// Validate and wrap a justification string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the length is outside 10–2000 characters.
    pub fn new(reason: &str) -> Result<Self, ValidationError> {
        validated(reason, Self::MIN, Self::MAX).map(Self)
    }

    /// Return the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A validated rejection reason (5–2000 characters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RejectionReason(String);

impl RejectionReason {
    /// Minimum accepted length.
    pub const MIN: usize = 5;
    /// Maximum accepted length.
    pub const MAX: usize = 2000;

    /// Validate and wrap a rejection reason string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the length is outside 5–2000 characters.
    pub fn new(reason: &str) -> Result<Self, ValidationError> {
        validated(reason, Self::MIN, Self::MAX).map(Self)
    }

    /// Return the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// The outcome an admin applies to a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Grant the request.
    Approve,
    /// Decline the request with a reason.
    Reject(RejectionReason),
}

impl Decision {
    /// The terminal status this decision resolves to.
    #[must_use]
    pub fn status(&self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject(_) => RequestStatus::Rejected,
        }
    }

    /// Rejection reason text, if the decision is a rejection.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Self::Approve => None,
            Self::Reject(reason) => Some(reason.as_str()),
        }
    }
}

fn validated(value: &str, min: usize, max: usize) -> Result<String, ValidationError> {
    let got = value.chars().count();
    if got < min {
        return Err(ValidationError::TooShort { min, got });
    }
    if got > max {
        return Err(ValidationError::TooLong { max, got });
    }
    Ok(value.to_owned())
}
