use serde::{Deserialize, Serialize};

/// Outcome of a single reachability probe.
///
/// Probes never fail as errors; every failure mode is captured here as
/// data and fed into the status state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// The target answered with HTTP 200.
    Up { status_code: u16, latency_ms: u64 },
    /// Anything else: non-200 status, connect/DNS error, or timeout.
    Down { error: String },
}

impl ProbeOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeOutcome::Up { .. })
    }

    /// Error description for failed probes, `None` for successes.
    pub fn error(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Up { .. } => None,
            ProbeOutcome::Down { error } => Some(error),
        }
    }
}

/// Aggregate counts returned by a manual sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub online: usize,
    pub offline: usize,
}
