use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CheckState;

/// Why a probe produced no response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NetworkError,
    TimeoutError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NetworkError => write!(f, "network error"),
            ErrorKind::TimeoutError => write!(f, "timeout"),
        }
    }
}

/// Terminal result of one probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A response arrived with this status code
    Response { status: u16 },
    /// The attempt ended without a response
    Failure(ErrorKind),
}

impl Outcome {
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Outcome::Response { status } => Some(*status),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Response { .. } => None,
            Outcome::Failure(kind) => Some(*kind),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Response { status } => write!(f, "HTTP {status}"),
            Outcome::Failure(kind) => write!(f, "{kind}"),
        }
    }
}

/// What happened to the transition alert of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDisposition {
    /// First classification or no state change
    NotWarranted,
    Sent,
    /// Delivery failed; the state write still stands
    Failed,
}

/// Result of one completed check pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Store key of the check
    pub check_id: String,

    /// What the probe observed
    pub outcome: Outcome,

    /// State stored before this probe
    pub previous_state: CheckState,

    /// State written by this probe
    pub state: CheckState,

    /// Timestamp written as `lastChecked`
    pub checked_at: DateTime<Utc>,

    pub alert: AlertDisposition,
}

impl ProbeReport {
    pub fn changed(&self) -> bool {
        self.previous_state != self.state
    }
}
