use super::types::Outcome;
use crate::models::{Check, CheckState};

/// Classify a probe outcome against the check's success codes.
///
/// `up` only for a response whose status is listed; errors and unlisted
/// codes are `down`.
pub fn evaluate(outcome: &Outcome, check: &Check) -> CheckState {
    match outcome {
        Outcome::Response { status } if check.success_codes.contains(status) => CheckState::Up,
        _ => CheckState::Down,
    }
}
