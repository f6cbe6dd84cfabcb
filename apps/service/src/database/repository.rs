use anyhow::Result;
use async_trait::async_trait;
use libsql::params;
use std::time::SystemTime;
use uuid::Uuid;

use super::models::{StatusRecord, Target, TargetKind, TargetState};
use crate::monitoring::types::ProbeOutcome;
use crate::pool::{StoreManager, StorePool};

/// Database trait for abstracting storage operations
///
/// Targets and their status records live in the same store and are
/// created and deleted together; the trait keeps those pairings atomic
/// so callers never observe a target without a record or vice versa.
#[async_trait]
pub trait Database: Send + Sync {
    /// Insert a target together with its initial `NotChecked` record.
    async fn insert_target(&self, target: &Target) -> Result<()>;

    /// Delete a target and its status record. Returns false if absent.
    async fn delete_target(&self, id: Uuid) -> Result<bool>;

    /// All targets in creation order.
    async fn list_targets(&self) -> Result<Vec<Target>>;

    /// Look up a single target.
    async fn get_target(&self, id: Uuid) -> Result<Option<Target>>;

    /// Current status record for a target.
    async fn get_status(&self, id: Uuid) -> Result<Option<StatusRecord>>;

    /// Point-in-time view of every target with its record, creation order.
    async fn snapshot(&self) -> Result<Vec<(Target, StatusRecord)>>;

    /// Run the status transition for one probe outcome inside a single
    /// transaction. Returns `None` when the target no longer exists, so a
    /// probe finishing after removal cannot resurrect the record.
    async fn apply_outcome(
        &self,
        id: Uuid,
        outcome: &ProbeOutcome,
        now: SystemTime,
    ) -> Result<Option<StatusRecord>>;
}

/// LibSQL-backed implementation over a connection pool.
pub struct DatabaseImpl {
    pool: StorePool,
}

impl DatabaseImpl {
    pub fn new_from_pool(pool: StorePool) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> Result<deadpool::managed::Object<StoreManager>> {
        Ok(self.pool.get().await?)
    }
}

fn target_from_row(row: &libsql::Row) -> Result<Target> {
    let uuid_str: String = row.get(0)?;
    let kind_str: String = row.get(3)?;
    let created_at: i64 = row.get(4)?;

    Ok(Target {
        id: Uuid::parse_str(&uuid_str)?,
        name: row.get(1)?,
        url: row.get(2)?,
        kind: match kind_str.as_str() {
            "https" => TargetKind::Https,
            _ => TargetKind::Http,
        },
        created_at: Target::i64_to_timestamp(created_at),
    })
}

/// Parse the status columns (state, error, online_since, last_checked)
/// starting at `base` in the row.
fn status_from_row(row: &libsql::Row, id: Uuid, base: i32) -> Result<StatusRecord> {
    let state_str: String = row.get(base)?;

    Ok(StatusRecord {
        target_id: id,
        state: TargetState::parse(&state_str),
        error: row.get(base + 1)?,
        online_since: row.get::<Option<i64>>(base + 2)?.map(Target::i64_to_timestamp),
        last_checked: row.get::<Option<i64>>(base + 3)?.map(Target::i64_to_timestamp),
    })
}

#[async_trait]
impl Database for DatabaseImpl {
    async fn insert_target(&self, target: &Target) -> Result<()> {
        let conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        tx.execute(
            "INSERT INTO targets (uuid, name, url, kind, created_at) VALUES (?, ?, ?, ?, ?)",
            params![
                target.id.to_string(),
                target.name.clone(),
                target.url.clone(),
                target.kind.to_string(),
                Target::timestamp_to_i64(target.created_at)
            ],
        )
        .await?;

        tx.execute(
            "INSERT INTO status_records (target_uuid, state, error, online_since, last_checked) \
             VALUES (?, ?, NULL, NULL, NULL)",
            params![target.id.to_string(), TargetState::NotChecked.to_string()],
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_target(&self, id: Uuid) -> Result<bool> {
        let conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let removed = tx
            .execute("DELETE FROM targets WHERE uuid = ?", params![id.to_string()])
            .await?;
        tx.execute(
            "DELETE FROM status_records WHERE target_uuid = ?",
            params![id.to_string()],
        )
        .await?;

        tx.commit().await?;
        Ok(removed > 0)
    }

    async fn list_targets(&self) -> Result<Vec<Target>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query("SELECT uuid, name, url, kind, created_at FROM targets ORDER BY id", ())
            .await?;

        let mut targets = Vec::new();
        while let Some(row) = rows.next().await? {
            targets.push(target_from_row(&row)?);
        }

        Ok(targets)
    }

    async fn get_target(&self, id: Uuid) -> Result<Option<Target>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                "SELECT uuid, name, url, kind, created_at FROM targets WHERE uuid = ?",
                params![id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(target_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_status(&self, id: Uuid) -> Result<Option<StatusRecord>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                "SELECT state, error, online_since, last_checked FROM status_records \
                 WHERE target_uuid = ?",
                params![id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(status_from_row(&row, id, 0)?)),
            None => Ok(None),
        }
    }

    async fn snapshot(&self) -> Result<Vec<(Target, StatusRecord)>> {
        let conn = self.get_conn().await?;
        // Single statement, so the view cannot straddle a transition
        let mut rows = conn
            .query(
                "SELECT t.uuid, t.name, t.url, t.kind, t.created_at, \
                        s.state, s.error, s.online_since, s.last_checked \
                 FROM targets t \
                 JOIN status_records s ON s.target_uuid = t.uuid \
                 ORDER BY t.id",
                (),
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            let target = target_from_row(&row)?;
            let record = status_from_row(&row, target.id, 5)?;
            entries.push((target, record));
        }

        Ok(entries)
    }

    async fn apply_outcome(
        &self,
        id: Uuid,
        outcome: &ProbeOutcome,
        now: SystemTime,
    ) -> Result<Option<StatusRecord>> {
        // Timestamps persist at whole-second precision; truncate before
        // the transition so the returned record matches a later read
        let now = Target::i64_to_timestamp(Target::timestamp_to_i64(now));

        let conn = self.get_conn().await?;
        let tx = conn.transaction().await?;

        let mut rows = tx
            .query(
                "SELECT state, error, online_since, last_checked FROM status_records \
                 WHERE target_uuid = ?",
                params![id.to_string()],
            )
            .await?;

        let mut record = match rows.next().await? {
            Some(row) => status_from_row(&row, id, 0)?,
            None => return Ok(None),
        };
        drop(rows);

        record.apply(outcome, now);

        tx.execute(
            "UPDATE status_records SET state = ?, error = ?, online_since = ?, last_checked = ? \
             WHERE target_uuid = ?",
            params![
                record.state.to_string(),
                record.error.clone(),
                record.online_since.map(Target::timestamp_to_i64),
                record.last_checked.map(Target::timestamp_to_i64),
                id.to_string()
            ],
        )
        .await?;

        tx.commit().await?;
        Ok(Some(record))
    }
}
