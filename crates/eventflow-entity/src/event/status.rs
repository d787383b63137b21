//! Event status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an event.
///
/// Only the workflow orchestrator writes this column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Being edited by its organiser.
    Draft,
    /// Submitted and waiting for an admin decision.
    PendingApproval,
    /// Approved and publicly visible.
    Published,
    /// Withdrawn after publication.
    Cancelled,
    /// Declined by an admin.
    Rejected,
}

impl EventStatus {
    /// Whether no further transitions leave this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Rejected)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }

    /// Human wording used in error messages ("pending approval").
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Draft => "a draft",
            Self::PendingApproval => "pending approval",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = eventflow_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending_approval" => Ok(Self::PendingApproval),
            "published" => Ok(Self::Published),
            "cancelled" => Ok(Self::Cancelled),
            "rejected" => Ok(Self::Rejected),
            _ => Err(eventflow_core::AppError::validation(format!(
                "Invalid event status: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for status in [
            EventStatus::Draft,
            EventStatus::PendingApproval,
            EventStatus::Published,
            EventStatus::Cancelled,
            EventStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
        assert!("approved".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(EventStatus::Rejected.is_terminal());
        assert!(EventStatus::Cancelled.is_terminal());
        assert!(!EventStatus::Published.is_terminal());
    }
}
