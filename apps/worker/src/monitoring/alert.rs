use crate::models::{Check, CheckState};

/// Whether a transition alert must fire for this probe.
///
/// `previous` is the check as stored before the probe. The first ever
/// classification never alerts, whatever its result.
pub fn alert_warranted(previous: &Check, new_state: CheckState) -> bool {
    previous.has_been_checked() && previous.state != new_state
}

/// Text sent to the owner on a transition
pub fn alert_message(check: &Check, state: CheckState) -> String {
    format!(
        "Alert: your check for {} {}://{} is currently {}",
        check.method, check.protocol, check.url, state
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Method, Protocol};
    use chrono::Utc;

    fn check(state: CheckState, checked: bool) -> Check {
        Check {
            id: "abcdefghij0123456789".to_string(),
            owner_id: "5551234567".to_string(),
            protocol: Protocol::Https,
            url: "example.com/health".to_string(),
            method: Method::Post,
            success_codes: vec![200],
            timeout_seconds: 2,
            state,
            last_checked: checked.then(Utc::now),
        }
    }

    #[test]
    fn test_first_probe_never_alerts() {
        assert!(!alert_warranted(&check(CheckState::Down, false), CheckState::Up));
        assert!(!alert_warranted(&check(CheckState::Down, false), CheckState::Down));
    }

    #[test]
    fn test_transition_alerts() {
        assert!(alert_warranted(&check(CheckState::Down, true), CheckState::Up));
        assert!(alert_warranted(&check(CheckState::Up, true), CheckState::Down));
    }

    #[test]
    fn test_unchanged_state_does_not_alert() {
        assert!(!alert_warranted(&check(CheckState::Up, true), CheckState::Up));
        assert!(!alert_warranted(&check(CheckState::Down, true), CheckState::Down));
    }

    #[test]
    fn test_alert_message() {
        let message = alert_message(&check(CheckState::Down, true), CheckState::Up);
        assert_eq!(message, "Alert: your check for POST https://example.com/health is currently up");
    }
}
