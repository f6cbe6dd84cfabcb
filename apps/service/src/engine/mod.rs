/// Engine module - coordinates all components
///
/// The engine owns the lifecycle of the whole stack: it builds the
/// repository over the connection pool, hands a shared reference to the
/// registry and status store, wires the prober into the scheduler, and
/// tears the timers down again on shutdown. Nothing here is a global;
/// the presentation layer receives an `Engine` and calls through it.


use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::database::{Database, DatabaseImpl, initialize_database};
use crate::monitoring::{Prober, Scheduler, SchedulerConfig};
use crate::pool::StorePool;
use crate::registry::Registry;
use crate::status::StatusStore;

/// Fully wired health-monitoring engine.
pub struct Engine {
    registry: Registry,
    store: StatusStore,
    scheduler: Arc<Scheduler>,
}

impl Engine {
    /// Build an engine on top of an (already opened) connection pool.
    ///
    /// Runs migrations, then constructs the registry/status store pair
    /// and the scheduler. Timers do not start until [`Engine::run`] or
    /// [`Scheduler::start`] is called.
    pub async fn new(config: &Config, pool: StorePool) -> Result<Self> {
        let conn = pool.get().await?;
        info!("initializing database schema");
        initialize_database(&conn).await?;
        drop(conn);

        let database: Arc<dyn Database> = Arc::new(DatabaseImpl::new_from_pool(pool));
        let registry = Registry::new(database.clone());
        let store = StatusStore::new(database);

        let prober = Arc::new(Prober::new(config.probe.timeout_seconds)?);
        let scheduler = Arc::new(Scheduler::new(
            registry.clone(),
            store.clone(),
            prober,
            SchedulerConfig {
                poll_interval: Duration::from_secs(config.scheduler.poll_interval_seconds),
                scan_interval: Duration::from_secs(config.scheduler.scan_interval_seconds),
            },
        ));

        Ok(Self { registry, store, scheduler })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn status(&self) -> &StatusStore {
        &self.store
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Start the scheduler and block until ctrl-c, then cancel all
    /// timers.
    pub async fn run(&self) -> Result<()> {
        self.scheduler.start().await;
        info!("engine started");

        tokio::signal::ctrl_c().await?;
        info!("shutdown signal received");

        self.scheduler.shutdown().await;
        Ok(())
    }
}
