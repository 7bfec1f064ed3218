// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of Quire.
//
// Quire is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Quire is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Quire. If not, see <https://www.gnu.org/licenses/>.

//! SQLite lock backend.
//!
//! One `locks` table shared by every process that opens the same database
//! file:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS locks (
//!   name TEXT NOT NULL PRIMARY KEY,
//!   holder TEXT NOT NULL,
//!   expiration INTEGER NOT NULL
//! );
//! ```
//!
//! `expiration` is stored as UNIX epoch seconds. Acquisition is a single
//! upsert whose `DO UPDATE ... WHERE` clause carries the liveness predicate,
//! so the decision and the write happen inside one statement. The database
//! runs in WAL mode with a busy timeout; concurrent writers queue on the
//! SQLite write lock instead of failing.

use crate::{LockBackend, LockError, LockRecord, LockResult};
use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based lock backend.
#[derive(Clone)]
pub struct SqliteLockBackend {
    pool: SqlitePool,
}

impl SqliteLockBackend {
    /// Open (creating if missing) the database file at `path`.
    ///
    /// Parent directories are created as needed. `":memory:"` is routed to
    /// [`SqliteLockBackend::in_memory`].
    ///
    /// ## Examples
    /// ```rust,no_run
    /// # use quire_locks::sql::SqliteLockBackend;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let backend = SqliteLockBackend::open("data/locks/lockstore.sqlite", 5).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> LockResult<Self> {
        let path = path.as_ref();
        if path == Path::new(":memory:") {
            return Self::in_memory().await;
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| LockError::StorageError(format!("failed to open SQLite database: {e}")))?;

        debug!(max_connections, "opened SQLite lock database");
        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// Limited to a single pooled connection that is never recycled, so the
    /// database lives exactly as long as this backend and its clones.
    pub async fn in_memory() -> LockResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| LockError::ConfigError(format!("invalid SQLite URL: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| LockError::StorageError(format!("failed to open in-memory SQLite: {e}")))?;

        Ok(Self { pool })
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn record_from_row(row: &SqliteRow) -> LockResult<LockRecord> {
        Ok(LockRecord {
            name: row.try_get("name")?,
            holder: row.try_get("holder")?,
            expires_at: row.try_get("expiration")?,
        })
    }
}

#[async_trait]
impl LockBackend for SqliteLockBackend {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    #[instrument(skip(self))]
    async fn initialize(&self) -> LockResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS locks (
              name TEXT NOT NULL PRIMARY KEY,
              holder TEXT NOT NULL,
              expiration INTEGER NOT NULL
            );
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| LockError::StorageError(format!("failed to create locks table: {e}")))?;

        // Pruning scans by expiration.
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_locks_expiration ON locks(expiration)")
            .execute(&self.pool)
            .await
            .map_err(|e| LockError::StorageError(format!("failed to create index: {e}")))?;

        info!("lock table ready");
        Ok(())
    }

    async fn fetch_live(&self, name: &str, now: i64) -> LockResult<Option<LockRecord>> {
        let row = sqlx::query(
            r#"SELECT name, holder, expiration
               FROM locks WHERE name = ?1 AND expiration > ?2"#,
        )
        .bind(name)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    #[instrument(skip(self, record), fields(name = %record.name, holder = %record.holder))]
    async fn try_acquire(&self, record: &LockRecord, now: i64) -> LockResult<bool> {
        // The WHERE on DO UPDATE is the read predicate negated for other
        // holders: a live row owned by someone else yields zero changed rows.
        let result = sqlx::query(
            r#"INSERT INTO locks (name, holder, expiration)
               VALUES (?1, ?2, ?3)
               ON CONFLICT(name) DO UPDATE SET
                   holder = excluded.holder,
                   expiration = excluded.expiration
               WHERE locks.holder = excluded.holder
                  OR locks.expiration <= ?4"#,
        )
        .bind(&record.name)
        .bind(&record.holder)
        .bind(record.expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let acquired = result.rows_affected() > 0;
        if !acquired {
            debug!("lock held by another holder");
        }
        Ok(acquired)
    }

    async fn release(&self, name: &str, holder: &str) -> LockResult<bool> {
        let result = sqlx::query("DELETE FROM locks WHERE name = ?1 AND holder = ?2")
            .bind(name)
            .bind(holder)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn prune_expired(&self, now: i64) -> LockResult<u64> {
        let result = sqlx::query("DELETE FROM locks WHERE expiration <= ?1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        debug!(pruned = result.rows_affected(), "pruned expired locks");
        Ok(result.rows_affected())
    }

    async fn list_live(&self, now: i64) -> LockResult<Vec<LockRecord>> {
        let rows = sqlx::query(
            r#"SELECT name, holder, expiration
               FROM locks WHERE expiration > ?1 ORDER BY name"#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::record_from_row).collect()
    }
}
