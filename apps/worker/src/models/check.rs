use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record field holding the up/down state
pub const FIELD_STATE: &str = "state";

/// Record field holding the last probe time in epoch milliseconds
pub const FIELD_LAST_CHECKED: &str = "lastChecked";

/// Up/down state of a check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Up,
    #[default]
    Down,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckState::Up => write!(f, "up"),
            CheckState::Down => write!(f, "down"),
        }
    }
}

impl FromStr for CheckState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(CheckState::Up),
            "down" => Ok(CheckState::Down),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(()),
        }
    }
}

/// HTTP method used to probe a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for Method {
    type Err = ();

    /// Methods are matched case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(()),
        }
    }
}

/// A validated check record.
///
/// Only ever built by [`crate::monitoring::validation::validate_check`], so
/// every field already satisfies its constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub id: String,
    pub owner_id: String,
    pub protocol: Protocol,
    pub url: String,
    pub method: Method,
    pub success_codes: Vec<u16>,
    pub timeout_seconds: u64,
    pub state: CheckState,
    pub last_checked: Option<DateTime<Utc>>,
}

impl Check {
    /// Full probe target, `protocol://url`
    pub fn target(&self) -> String {
        format!("{}://{}", self.protocol, self.url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Whether this check has ever been classified
    pub fn has_been_checked(&self) -> bool {
        self.last_checked.is_some()
    }
}

/// Copy of `record` carrying the result of a probe.
///
/// Every other field, including ones this worker does not know about, is
/// kept as stored.
pub fn record_with_probe(record: &Value, state: CheckState, checked_at: DateTime<Utc>) -> Value {
    let mut updated = record.clone();
    if let Value::Object(fields) = &mut updated {
        fields.insert(FIELD_STATE.to_string(), Value::String(state.to_string()));
        fields.insert(FIELD_LAST_CHECKED.to_string(), Value::from(checked_at.timestamp_millis()));
    }
    updated
}
