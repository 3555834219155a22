//! Defensive validation of raw check records.
//!
//! Records reach the worker through the record store as untyped JSON, so
//! every field is re-checked here before anything is probed or written.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::check::{FIELD_LAST_CHECKED, FIELD_STATE};
use crate::models::{Check, CheckState, Method, Protocol};

pub const ID_LENGTH: usize = 20;
pub const OWNER_ID_LENGTH: usize = 10;
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_TIMEOUT_SECONDS: u64 = 5;

/// Legacy field name for the owner key
const FIELD_OWNER_LEGACY: &str = "userPhone";

/// Validate a raw record and build a [`Check`].
///
/// `state` falls back to `down` and `lastChecked` to "never" when missing or
/// malformed. Any other malformed field rejects the whole record.
pub fn validate_check(record: &Value) -> Result<Check, ValidationError> {
    let fields = record.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(Check {
        id: validate_id(field(fields, "id"))?,
        owner_id: validate_owner_id(field(fields, "ownerId").or_else(|| field(fields, FIELD_OWNER_LEGACY)))?,
        protocol: validate_protocol(field(fields, "protocol"))?,
        url: validate_url(field(fields, "url"))?,
        method: validate_method(field(fields, "method"))?,
        success_codes: validate_success_codes(field(fields, "successCodes"))?,
        timeout_seconds: validate_timeout(field(fields, "timeoutSeconds"))?,
        state: normalize_state(field(fields, FIELD_STATE)),
        last_checked: normalize_last_checked(field(fields, FIELD_LAST_CHECKED)),
    })
}

/// Look up a field, treating JSON null as absent
fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|value| !value.is_null())
}

fn trimmed_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).map(str::trim)
}

/// Integer value of a JSON number, accepting floats with no fractional part
fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0)
        .map(|n| n as u64)
}

fn validate_id(value: Option<&Value>) -> Result<String, ValidationError> {
    trimmed_str(value)
        .filter(|id| id.chars().count() == ID_LENGTH)
        .map(str::to_string)
        .ok_or(ValidationError::InvalidId)
}

fn validate_owner_id(value: Option<&Value>) -> Result<String, ValidationError> {
    trimmed_str(value)
        .filter(|owner| owner.len() == OWNER_ID_LENGTH && owner.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .ok_or(ValidationError::InvalidOwner)
}

fn validate_protocol(value: Option<&Value>) -> Result<Protocol, ValidationError> {
    value
        .and_then(Value::as_str)
        .and_then(|protocol| protocol.parse().ok())
        .ok_or(ValidationError::InvalidProtocol)
}

fn validate_url(value: Option<&Value>) -> Result<String, ValidationError> {
    trimmed_str(value)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::EmptyUrl)
}

fn validate_method(value: Option<&Value>) -> Result<Method, ValidationError> {
    value
        .and_then(Value::as_str)
        .and_then(|method| method.parse().ok())
        .ok_or(ValidationError::InvalidMethod)
}

fn validate_success_codes(value: Option<&Value>) -> Result<Vec<u16>, ValidationError> {
    let entries = value
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::InvalidSuccessCodes("expected a list".to_string()))?;

    if entries.is_empty() {
        return Err(ValidationError::InvalidSuccessCodes("list cannot be empty".to_string()));
    }

    let mut codes: Vec<u16> = Vec::with_capacity(entries.len());
    for entry in entries {
        let code = whole_number(entry)
            .filter(|code| (100..=599).contains(code))
            .ok_or_else(|| {
                ValidationError::InvalidSuccessCodes(format!("{entry} is not an HTTP status code"))
            })? as u16;
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    Ok(codes)
}

fn validate_timeout(value: Option<&Value>) -> Result<u64, ValidationError> {
    value
        .and_then(whole_number)
        .filter(|seconds| (MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(seconds))
        .ok_or(ValidationError::InvalidTimeout)
}

fn normalize_state(value: Option<&Value>) -> CheckState {
    value
        .and_then(Value::as_str)
        .and_then(|state| state.parse().ok())
        .unwrap_or_default()
}

/// Any positive number means the check has been probed before. Values past
/// the representable range clamp to the latest timestamp.
fn normalize_last_checked(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let millis = value?.as_f64().filter(|n| n.is_finite() && *n > 0.0)?;
    Some(DateTime::from_timestamp_millis(millis as i64).unwrap_or(DateTime::<Utc>::MAX_UTC))
}
