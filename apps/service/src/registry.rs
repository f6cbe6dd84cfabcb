//! Target registry - owns the durable set of monitored endpoints.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::database::Database;
use crate::database::models::Target;
use crate::error::EngineError;
use crate::validation::{MAX_NAME_LEN, validate_and_sterilize, validate_url};

/// Registration surface for monitored targets.
///
/// All mutation goes through here; the scheduler and the snapshot API
/// only ever read. Validation failures are returned before anything is
/// written.
#[derive(Clone)]
pub struct Registry {
    db: Arc<dyn Database>,
}

impl Registry {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Register a new target and its initial `NotChecked` status record.
    pub async fn add(&self, name: &str, url: &str) -> Result<Target, EngineError> {
        let name = validate_and_sterilize(name, MAX_NAME_LEN)?;
        let url = validate_url(url)?;

        let target = Target::new(name, url);
        self.db.insert_target(&target).await?;

        info!(id = %target.id, name = %target.name, "registered target");
        Ok(target)
    }

    /// Remove a target and its status record as one atomic unit.
    ///
    /// A probe already in flight for the target is not aborted; its
    /// result is discarded when it tries to apply against the missing
    /// record.
    pub async fn remove(&self, id: Uuid) -> Result<(), EngineError> {
        if self.db.delete_target(id).await? {
            info!(%id, "removed target");
            Ok(())
        } else {
            Err(EngineError::NotFound(id))
        }
    }

    /// All registered targets in creation order.
    pub async fn list(&self) -> Result<Vec<Target>, EngineError> {
        Ok(self.db.list_targets().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Target>, EngineError> {
        Ok(self.db.get_target(id).await?)
    }
}
