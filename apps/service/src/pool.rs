use deadpool::managed::{self, Pool, RecycleError, RecycleResult};
use libsql::{Connection, Database, Error as LibsqlError};

/// Deadpool manager handing out connections to the local libsql database.
pub struct StoreManager {
    database: Database,
}

impl StoreManager {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl managed::Manager for StoreManager {
    type Type = Connection;
    type Error = LibsqlError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        self.database.connect()
    }

    async fn recycle(
        &self,
        conn: &mut Self::Type,
        _: &managed::Metrics,
    ) -> RecycleResult<Self::Error> {
        // Liveness check before the connection is handed back out
        conn.query("SELECT 1", ())
            .await
            .map_err(RecycleError::Backend)?
            .next()
            .await
            .map_err(RecycleError::Backend)?;
        Ok(())
    }
}

pub type StorePool = Pool<StoreManager>;

/// Open (or create) the database file at `path` and wrap it in a pool.
///
/// The pool is capped at one connection: SQLite serializes writers on a
/// local file, and overlapping write transactions from separate
/// connections would surface as SQLITE_BUSY.
pub async fn build_pool(path: &str) -> anyhow::Result<StorePool> {
    let database = libsql::Builder::new_local(path).build().await?;
    let manager = StoreManager::new(database);
    let pool = Pool::builder(manager).config(managed::PoolConfig::new(1)).build()?;
    Ok(pool)
}
