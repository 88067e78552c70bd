use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OpenFlags, OptionalExtension};
use std::path::Path;

use super::types::NodeRecord;
use crate::error::GatewayError;

const READ_POOL_SIZE: u32 = 8;

/// Read-only access to the `chord` table.
///
/// The SQLite file is owned and written by the ring's nodes; the gateway only
/// ever reads it. Connections are opened with `SQLITE_OPEN_READ_ONLY` and
/// handed out by a bounded r2d2 pool, so concurrent requests never open
/// ad-hoc connections. All rusqlite calls run under `spawn_blocking`.
pub struct RingStore {
    pool: Pool<SqliteConnectionManager>,
}

impl RingStore {
    /// Open the database read-only and verify the `chord` table is readable.
    ///
    /// Fails at startup when the file does not exist or the table is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let manager = SqliteConnectionManager::file(path.as_ref()).with_flags(
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        );
        let pool = Pool::builder().max_size(READ_POOL_SIZE).build(manager)?;

        let conn = pool.get()?;
        conn.query_row("SELECT COUNT(*) FROM chord", [], |row| row.get::<_, u64>(0))?;

        Ok(Self { pool })
    }

    /// All rows in insertion order. Rowid order pins down which node counts
    /// as "first" for entry-node selection.
    pub async fn list_nodes(&self) -> Result<Vec<NodeRecord>, GatewayError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT self, successor FROM chord ORDER BY rowid")?;
            let rows = stmt.query_map([], |row| {
                Ok(NodeRecord {
                    id: row.get(0)?,
                    successor: row.get(1)?,
                })
            })?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(|e| GatewayError::Blocking(e.to_string()))?
    }

    /// The entry node for get/put operations, or `None` on an empty ring.
    pub async fn first_node(&self) -> Result<Option<NodeRecord>, GatewayError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let record = conn
                .query_row(
                    "SELECT self, successor FROM chord ORDER BY rowid LIMIT 1",
                    [],
                    |row| {
                        Ok(NodeRecord {
                            id: row.get(0)?,
                            successor: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(record)
        })
        .await
        .map_err(|e| GatewayError::Blocking(e.to_string()))?
    }

    pub async fn node_count(&self) -> Result<u64, GatewayError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let count = conn.query_row("SELECT COUNT(*) FROM chord", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| GatewayError::Blocking(e.to_string()))?
    }
}
