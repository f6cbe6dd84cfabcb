/// Monitoring engine module - probing and scheduling
///
/// This module is responsible for:
/// - Performing single HTTP(S) reachability probes
/// - Driving each target's independent probe timer
/// - Running manual sweeps across all registered targets
pub mod prober;
pub mod scheduler;
pub mod types;

pub use prober::Prober;
pub use scheduler::{Scheduler, SchedulerConfig};
pub use types::{ProbeOutcome, SweepSummary};
