//! Status store - current health state per target.

use std::sync::Arc;
use std::time::SystemTime;
use uuid::Uuid;

use crate::database::Database;
use crate::database::models::{StatusRecord, Target};
use crate::error::EngineError;
use crate::monitoring::types::ProbeOutcome;

/// Read/write surface for status records.
///
/// The scheduler writes through [`StatusStore::apply`]; the presentation
/// layer reads through [`StatusStore::snapshot`]. Each apply runs as one
/// storage transaction, so updates for the same target serialize and a
/// snapshot never sees a half-applied transition.
#[derive(Clone)]
pub struct StatusStore {
    db: Arc<dyn Database>,
}

impl StatusStore {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<StatusRecord>, EngineError> {
        Ok(self.db.get_status(id).await?)
    }

    /// Consistent point-in-time view of every target and its record,
    /// in creation order.
    pub async fn snapshot(&self) -> Result<Vec<(Target, StatusRecord)>, EngineError> {
        Ok(self.db.snapshot().await?)
    }

    /// Apply a probe outcome to a target's record.
    ///
    /// Returns `NotFound` when the target vanished between scheduling and
    /// completion; callers discard the outcome in that case.
    pub async fn apply(
        &self,
        id: Uuid,
        outcome: &ProbeOutcome,
    ) -> Result<StatusRecord, EngineError> {
        match self.db.apply_outcome(id, outcome, SystemTime::now()).await? {
            Some(record) => Ok(record),
            None => Err(EngineError::NotFound(id)),
        }
    }
}
