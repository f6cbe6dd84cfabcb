use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::prober::Prober;
use super::types::SweepSummary;
use crate::database::models::{StatusRecord, Target};
use crate::error::EngineError;
use crate::registry::Registry;
use crate::status::StatusStore;

/// Timing knobs for the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cadence of each target's own probe timer.
    pub poll_interval: Duration,
    /// How often the registry is rescanned for added targets.
    pub scan_interval: Duration,
}

/// Drives periodic probing of every registered target.
///
/// Each target runs on its own tokio task and timer, so a slow or hung
/// endpoint never delays the others. The scan loop picks up newly added
/// targets within one scan interval; per-target tasks notice removal on
/// their next tick and exit. An in-flight probe for a removed target is
/// allowed to finish, and its result is discarded when the apply comes
/// back `NotFound`.
pub struct Scheduler {
    registry: Registry,
    store: StatusStore,
    prober: Arc<Prober>,
    config: SchedulerConfig,
    tasks: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
    scan_task: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(
        registry: Registry,
        store: StatusStore,
        prober: Arc<Prober>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry,
            store,
            prober,
            config,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            scan_task: Mutex::new(None),
        }
    }

    /// Start the registry scan loop. Idempotent.
    pub async fn start(&self) {
        let mut scan_task = self.scan_task.lock().await;
        if scan_task.is_some() {
            return;
        }

        let registry = self.registry.clone();
        let store = self.store.clone();
        let prober = self.prober.clone();
        let tasks = self.tasks.clone();
        let config = self.config.clone();

        info!(
            poll_secs = config.poll_interval.as_secs(),
            scan_secs = config.scan_interval.as_secs(),
            "starting scheduler"
        );

        *scan_task = Some(tokio::spawn(async move {
            let mut timer = interval(config.scan_interval);
            loop {
                timer.tick().await;
                if let Err(e) =
                    scan_registry(&registry, &store, &prober, &tasks, config.poll_interval).await
                {
                    error!("registry scan failed: {:#}", e);
                }
            }
        }));
    }

    /// Probe every target in the current registry snapshot concurrently
    /// and apply the results.
    ///
    /// Returns once the slowest probe has completed or timed out - the
    /// overall wait is bounded by one probe timeout, not the sum. Targets
    /// removed mid-sweep still count toward the totals; their results are
    /// simply not recorded.
    pub async fn refresh_now(&self) -> Result<SweepSummary, EngineError> {
        let targets = self.registry.list().await?;

        let probes = targets.iter().map(|target| {
            let prober = self.prober.clone();
            async move { (target.id, prober.probe(&target.url).await) }
        });
        let outcomes = futures::future::join_all(probes).await;

        let mut summary = SweepSummary { online: 0, offline: 0 };
        for (id, outcome) in outcomes {
            if outcome.is_up() {
                summary.online += 1;
            } else {
                summary.offline += 1;
            }

            match self.store.apply(id, &outcome).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    debug!(%id, "discarding result for removed target")
                }
                Err(e) => return Err(e),
            }
        }

        info!(online = summary.online, offline = summary.offline, "manual sweep complete");
        Ok(summary)
    }

    /// Probe a single target immediately and apply the result.
    pub async fn refresh_target(&self, id: Uuid) -> Result<StatusRecord, EngineError> {
        let target = self.registry.get(id).await?.ok_or(EngineError::NotFound(id))?;
        let outcome = self.prober.probe(&target.url).await;
        self.store.apply(id, &outcome).await
    }

    /// Cancel the scan loop and every per-target timer.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.scan_task.lock().await.take() {
            handle.abort();
        }

        let mut tasks = self.tasks.lock().await;
        for (id, handle) in tasks.drain() {
            debug!(%id, "cancelling target timer");
            handle.abort();
        }

        info!("scheduler stopped");
    }
}

/// One pass of the scan loop: prune exited tasks and spawn timers for
/// targets that do not have one yet.
async fn scan_registry(
    registry: &Registry,
    store: &StatusStore,
    prober: &Arc<Prober>,
    tasks: &Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
    poll_interval: Duration,
) -> Result<(), EngineError> {
    let targets = registry.list().await?;

    let mut tasks = tasks.lock().await;
    tasks.retain(|_, handle| !handle.is_finished());

    for target in targets {
        if tasks.contains_key(&target.id) {
            continue;
        }

        debug!(id = %target.id, name = %target.name, "scheduling target");
        let id = target.id;
        let handle = tokio::spawn(watch_target(
            registry.clone(),
            store.clone(),
            prober.clone(),
            target,
            poll_interval,
        ));
        tasks.insert(id, handle);
    }

    Ok(())
}

/// Per-target probe loop. Exits when the target disappears from the
/// registry.
async fn watch_target(
    registry: Registry,
    store: StatusStore,
    prober: Arc<Prober>,
    target: Target,
    poll_interval: Duration,
) {
    let mut timer = interval(poll_interval);

    loop {
        timer.tick().await;

        // Drop the timer once the target has been removed
        match registry.get(target.id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(id = %target.id, "target removed, dropping timer");
                break;
            }
            Err(e) => {
                warn!(id = %target.id, "registry lookup failed: {:#}", e);
                continue;
            }
        }

        let outcome = prober.probe(&target.url).await;
        match store.apply(target.id, &outcome).await {
            Ok(record) => {
                debug!(id = %target.id, state = %record.state, "applied probe result");
            }
            Err(e) if e.is_not_found() => {
                debug!(id = %target.id, "discarding result for removed target");
                break;
            }
            Err(e) => warn!(id = %target.id, "failed to apply probe result: {:#}", e),
        }
    }
}
