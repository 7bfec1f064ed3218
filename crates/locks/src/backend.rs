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

//! Storage seam for named locks.
//!
//! Locking semantics (TTL validation, renewal, the clock reading) live in
//! [`NamedLock`](crate::NamedLock). A backend only stores rows and provides
//! the one primitive that needs atomicity: the conditional write in
//! [`LockBackend::try_acquire`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::LockResult;

/// A persisted lock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Lock name (primary key).
    pub name: String,
    /// Current holder.
    pub holder: String,
    /// Absolute expiry in epoch seconds.
    pub expires_at: i64,
}

impl LockRecord {
    /// Create a record.
    pub fn new(name: impl Into<String>, holder: impl Into<String>, expires_at: i64) -> Self {
        Self {
            name: name.into(),
            holder: holder.into(),
            expires_at,
        }
    }

    /// A row is live iff its expiry is strictly after `now`.
    pub fn is_live(&self, now: i64) -> bool {
        self.expires_at > now
    }

    /// Seconds left until expiry, never negative.
    pub fn remaining_secs(&self, now: i64) -> u64 {
        self.expires_at.saturating_sub(now).max(0) as u64
    }
}

/// Backing store for named locks.
#[async_trait]
pub trait LockBackend: Send + Sync {
    /// Short backend identifier used in logs (`memory`, `sqlite`).
    fn kind(&self) -> &'static str;

    /// Create the lock table if it does not exist yet.
    ///
    /// ## Returns
    /// - `Err(LockError::StorageError)`: the medium cannot be created or opened
    async fn initialize(&self) -> LockResult<()>;

    /// Read the live row for `name`, treating rows with `expires_at <= now` as absent.
    async fn fetch_live(&self, name: &str, now: i64) -> LockResult<Option<LockRecord>>;

    /// Atomic conditional write.
    ///
    /// ## Behavior
    /// - No row, or an expired row: write `record`, return `true`
    /// - Live row held by `record.holder`: overwrite holder/expiry, return `true`
    /// - Live row held by someone else: leave it untouched, return `false`
    ///
    /// The check and the write must be one indivisible step with respect to
    /// every other caller sharing the store.
    async fn try_acquire(&self, record: &LockRecord, now: i64) -> LockResult<bool>;

    /// Delete the row for `name` if it is held by `holder`.
    ///
    /// ## Returns
    /// - `Ok(true)`: a row was deleted
    /// - `Ok(false)`: no row, or held by someone else (not an error)
    async fn release(&self, name: &str, holder: &str) -> LockResult<bool>;

    /// Delete every row with `expires_at <= now`, returning how many were removed.
    async fn prune_expired(&self, now: i64) -> LockResult<u64>;

    /// All live rows, ordered by name.
    async fn list_live(&self, now: i64) -> LockResult<Vec<LockRecord>>;
}
