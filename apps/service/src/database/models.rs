use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::monitoring::types::ProbeOutcome;

/// Scheme a target is reached over, derived from its URL at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Http,
    Https,
}

impl TargetKind {
    /// Derive the kind from an already-validated URL.
    pub fn from_url(url: &str) -> Self {
        if url.to_ascii_lowercase().starts_with("https://") {
            TargetKind::Https
        } else {
            TargetKind::Http
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Http => write!(f, "http"),
            TargetKind::Https => write!(f, "https"),
        }
    }
}

/// Target model - a registered service endpoint to monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub kind: TargetKind,
    pub created_at: SystemTime,
}

impl Target {
    /// Create a new target from already-validated, sterilized fields.
    pub fn new(name: String, url: String) -> Self {
        let kind = TargetKind::from_url(&url);
        Self { id: Uuid::new_v4(), name, url, kind, created_at: SystemTime::now() }
    }

    /// Convert SystemTime to Unix timestamp
    pub fn timestamp_to_i64(time: SystemTime) -> i64 {
        time.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64
    }

    /// Convert Unix timestamp to SystemTime
    pub fn i64_to_timestamp(timestamp: i64) -> SystemTime {
        UNIX_EPOCH + std::time::Duration::from_secs(timestamp as u64)
    }
}

/// Health state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    /// No probe has completed yet. Never re-entered once a probe runs.
    NotChecked,
    Running,
    NotRunning,
}

impl std::fmt::Display for TargetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetState::NotChecked => write!(f, "Not Checked"),
            TargetState::Running => write!(f, "Running"),
            TargetState::NotRunning => write!(f, "Not Running"),
        }
    }
}

impl TargetState {
    pub fn parse(s: &str) -> Self {
        match s {
            "Running" => TargetState::Running,
            "Not Running" => TargetState::NotRunning,
            _ => TargetState::NotChecked,
        }
    }
}

/// StatusRecord model - current health state for one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub target_id: Uuid,
    pub state: TargetState,
    pub error: Option<String>,
    pub online_since: Option<SystemTime>,
    pub last_checked: Option<SystemTime>,
}

impl StatusRecord {
    /// Fresh record for a newly registered target.
    pub fn new(target_id: Uuid) -> Self {
        Self {
            target_id,
            state: TargetState::NotChecked,
            error: None,
            online_since: None,
            last_checked: None,
        }
    }

    /// Apply a probe outcome to this record.
    ///
    /// Success sets the state to `Running` and clears the error;
    /// `online_since` is refreshed only when the previous state was not
    /// already `Running`. Failure sets `NotRunning` and records the error
    /// string, leaving `online_since` at the last known uptime start.
    /// Total over every (state, outcome) pair.
    pub fn apply(&mut self, outcome: &ProbeOutcome, now: SystemTime) {
        match outcome {
            ProbeOutcome::Up { .. } => {
                if self.state != TargetState::Running {
                    self.online_since = Some(now);
                }
                self.state = TargetState::Running;
                self.error = None;
            }
            ProbeOutcome::Down { error } => {
                self.state = TargetState::NotRunning;
                self.error = Some(error.clone());
            }
        }
        self.last_checked = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn up() -> ProbeOutcome {
        ProbeOutcome::Up { status_code: 200, latency_ms: 12 }
    }

    fn down(msg: &str) -> ProbeOutcome {
        ProbeOutcome::Down { error: msg.to_string() }
    }

    fn record_in(state: TargetState) -> StatusRecord {
        let mut record = StatusRecord::new(Uuid::new_v4());
        record.state = state;
        record
    }

    #[test]
    fn test_transition_totality() {
        let states = [TargetState::NotChecked, TargetState::Running, TargetState::NotRunning];
        let now = SystemTime::now();

        for state in states {
            let mut record = record_in(state);
            record.apply(&up(), now);
            assert_eq!(record.state, TargetState::Running);
            assert_eq!(record.error, None);

            let mut record = record_in(state);
            record.apply(&down("HTTP 500"), now);
            assert_eq!(record.state, TargetState::NotRunning);
            assert_eq!(record.error, Some("HTTP 500".to_string()));
        }
    }

    #[test]
    fn test_online_since_set_on_running_edge() {
        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let t2 = t1 + Duration::from_secs(60);
        let t3 = t2 + Duration::from_secs(60);

        let mut record = StatusRecord::new(Uuid::new_v4());

        record.apply(&up(), t1);
        assert_eq!(record.online_since, Some(t1));

        // Running -> Running must not refresh the uptime start
        record.apply(&up(), t2);
        assert_eq!(record.online_since, Some(t1));

        // Failure leaves the last known uptime start in place
        record.apply(&down("HTTP 503"), t2);
        assert_eq!(record.state, TargetState::NotRunning);
        assert_eq!(record.online_since, Some(t1));

        // Recovery is a NotRunning -> Running edge, so it refreshes
        record.apply(&up(), t3);
        assert_eq!(record.online_since, Some(t3));
    }

    #[test]
    fn test_last_checked_updates_on_every_apply() {
        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let t2 = t1 + Duration::from_secs(30);

        let mut record = StatusRecord::new(Uuid::new_v4());
        assert_eq!(record.last_checked, None);

        record.apply(&up(), t1);
        assert_eq!(record.last_checked, Some(t1));

        record.apply(&down("connection refused"), t2);
        assert_eq!(record.last_checked, Some(t2));
    }

    #[test]
    fn test_kind_derived_from_scheme() {
        assert_eq!(TargetKind::from_url("https://example.com"), TargetKind::Https);
        assert_eq!(TargetKind::from_url("http://example.com"), TargetKind::Http);
    }

    #[test]
    fn test_state_round_trip() {
        for state in [TargetState::NotChecked, TargetState::Running, TargetState::NotRunning] {
            assert_eq!(TargetState::parse(&state.to_string()), state);
        }
    }
}
