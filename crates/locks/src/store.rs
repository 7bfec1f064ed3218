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

//! Lock store and named lock handles.
//!
//! [`LockStore`] hands out [`NamedLock`] handles by name. A handle holds no
//! state of its own beyond its name: every query goes back to the backend, so
//! any two handles for the same name (from the same store, or from stores
//! sharing one database) always agree.

use crate::{Clock, LockBackend, LockRecord, LockResult, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Snapshot of one lock taken from a single read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStatus {
    /// Lock name.
    pub name: String,
    /// Current holder, `None` when unlocked.
    pub holder: Option<String>,
    /// Absolute expiry in epoch seconds, `None` when unlocked.
    pub expires_at: Option<i64>,
    /// Seconds until expiry, 0 when unlocked.
    pub locked_for: u64,
}

impl LockStatus {
    fn from_live(name: &str, live: Option<LockRecord>, now: i64) -> Self {
        match live {
            Some(record) => Self {
                name: name.to_string(),
                locked_for: record.remaining_secs(now),
                expires_at: Some(record.expires_at),
                holder: Some(record.holder),
            },
            None => Self {
                name: name.to_string(),
                holder: None,
                expires_at: None,
                locked_for: 0,
            },
        }
    }

    /// Whether the snapshot shows a live lock.
    pub fn is_locked(&self) -> bool {
        self.holder.is_some()
    }
}

/// Owner of the lock table; produces [`NamedLock`] handles.
#[derive(Clone)]
pub struct LockStore {
    backend: Arc<dyn LockBackend>,
    clock: Arc<dyn Clock>,
}

impl LockStore {
    /// Store over `backend` using the host wall clock.
    pub fn new(backend: Arc<dyn LockBackend>) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    /// Store over `backend` reading time from `clock`.
    pub fn with_clock(backend: Arc<dyn LockBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    /// Handle bound to `name`. Never touches storage.
    pub fn for_name(&self, name: impl Into<String>) -> NamedLock {
        NamedLock {
            name: name.into(),
            store: self.clone(),
        }
    }

    /// Create the lock table if needed. Safe to call repeatedly.
    pub async fn initialize(&self) -> LockResult<()> {
        self.backend.initialize().await
    }

    /// Physically delete expired rows.
    ///
    /// Lock queries already ignore expired rows; this only bounds storage growth.
    #[instrument(skip(self), fields(backend = self.backend.kind()))]
    pub async fn prune_expired(&self) -> LockResult<u64> {
        let now = self.clock.now();
        self.backend.prune_expired(now).await
    }

    /// Every live lock, ordered by name.
    pub async fn list_live(&self) -> LockResult<Vec<LockStatus>> {
        let now = self.clock.now();
        let records = self.backend.list_live(now).await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let name = record.name.clone();
                LockStatus::from_live(&name, Some(record), now)
            })
            .collect())
    }

    /// Backend identifier (`memory`, `sqlite`).
    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Current store time in epoch seconds.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }
}

impl fmt::Debug for LockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockStore")
            .field("backend", &self.backend.kind())
            .field("clock", &self.clock)
            .finish()
    }
}

/// Handle for one named resource.
///
/// ## Protocol
/// - `lock(holder, ttl)` succeeds iff the name is unlocked or already held by
///   `holder`; the expiry is reset to `now + ttl` (renewal may shorten it)
/// - A contended `lock()` returns `false` and leaves the incumbent untouched
/// - `unlock(holder)` only releases a lock held by `holder`; otherwise no-op
/// - A lock whose expiry has passed is unlocked, whether or not its row remains
#[derive(Debug, Clone)]
pub struct NamedLock {
    name: String,
    store: LockStore,
}

impl NamedLock {
    /// Name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a live lock exists for this name.
    pub async fn is_locked(&self) -> LockResult<bool> {
        let now = self.store.clock.now();
        Ok(self.store.backend.fetch_live(&self.name, now).await?.is_some())
    }

    /// Holder of the live lock, or `None` when unlocked.
    pub async fn locked_by(&self) -> LockResult<Option<String>> {
        let now = self.store.clock.now();
        let live = self.store.backend.fetch_live(&self.name, now).await?;
        Ok(live.map(|record| record.holder))
    }

    /// Seconds until the live lock expires, or 0 when unlocked.
    pub async fn locked_for(&self) -> LockResult<u64> {
        let now = self.store.clock.now();
        let live = self.store.backend.fetch_live(&self.name, now).await?;
        Ok(live.map_or(0, |record| record.remaining_secs(now)))
    }

    /// Holder, expiry and remaining time from one read.
    pub async fn status(&self) -> LockResult<LockStatus> {
        let now = self.store.clock.now();
        let live = self.store.backend.fetch_live(&self.name, now).await?;
        Ok(LockStatus::from_live(&self.name, live, now))
    }

    /// Try to lock this resource for `holder` for `ttl_secs` seconds.
    ///
    /// ## Returns
    /// - `Ok(true)`: `holder` now holds the lock, expiring `ttl_secs` from now
    /// - `Ok(false)`: `ttl_secs < 1`, or a different holder has a live lock
    /// - `Err(LockError::StorageError)`: the store failed
    #[instrument(skip(self), fields(name = %self.name, backend = self.store.backend.kind()))]
    pub async fn lock(&self, holder: &str, ttl_secs: i64) -> LockResult<bool> {
        if ttl_secs < 1 {
            debug!("rejecting non-positive ttl");
            return Ok(false);
        }

        let now = self.store.clock.now();
        let record = LockRecord::new(self.name.as_str(), holder, now.saturating_add(ttl_secs));
        let acquired = self.store.backend.try_acquire(&record, now).await?;

        debug!(acquired, expires_at = record.expires_at, "lock attempt finished");
        Ok(acquired)
    }

    /// Release the lock if `holder` holds it. Anything else is silently accepted.
    #[instrument(skip(self), fields(name = %self.name, backend = self.store.backend.kind()))]
    pub async fn unlock(&self, holder: &str) -> LockResult<()> {
        let released = self.store.backend.release(&self.name, holder).await?;
        debug!(released, "unlock finished");
        Ok(())
    }
}
