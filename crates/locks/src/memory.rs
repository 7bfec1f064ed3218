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

//! In-memory lock backend (for testing).

use crate::{LockBackend, LockRecord, LockResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// In-memory lock backend (for testing).
///
/// ## Purpose
/// Provides the [`LockBackend`] contract for tests and single-process use.
/// Clones share the same table, so handles built from clones are fungible.
///
/// ## Limitations
/// - Not persistent (locks lost on restart)
/// - Not distributed (single process only)
/// - Expired rows stay until pruned (they are already treated as unlocked)
#[derive(Clone, Default)]
pub struct MemoryLockBackend {
    locks: Arc<RwLock<HashMap<String, LockRecord>>>,
}

impl MemoryLockBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, expired ones included.
    pub async fn row_count(&self) -> usize {
        self.locks.read().await.len()
    }
}

#[async_trait]
impl LockBackend for MemoryLockBackend {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn initialize(&self) -> LockResult<()> {
        Ok(())
    }

    async fn fetch_live(&self, name: &str, now: i64) -> LockResult<Option<LockRecord>> {
        let locks = self.locks.read().await;
        Ok(locks.get(name).filter(|record| record.is_live(now)).cloned())
    }

    #[instrument(skip(self, record), fields(name = %record.name, holder = %record.holder))]
    async fn try_acquire(&self, record: &LockRecord, now: i64) -> LockResult<bool> {
        // Write guard held across check and insert.
        let mut locks = self.locks.write().await;

        if let Some(existing) = locks.get(&record.name) {
            if existing.is_live(now) && existing.holder != record.holder {
                debug!(incumbent = %existing.holder, "lock held by another holder");
                return Ok(false);
            }
        }

        locks.insert(record.name.clone(), record.clone());
        Ok(true)
    }

    async fn release(&self, name: &str, holder: &str) -> LockResult<bool> {
        let mut locks = self.locks.write().await;
        match locks.get(name) {
            Some(existing) if existing.holder == holder => {
                locks.remove(name);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn prune_expired(&self, now: i64) -> LockResult<u64> {
        let mut locks = self.locks.write().await;
        let before = locks.len();
        locks.retain(|_, record| record.is_live(now));
        Ok((before - locks.len()) as u64)
    }

    async fn list_live(&self, now: i64) -> LockResult<Vec<LockRecord>> {
        let locks = self.locks.read().await;
        let mut live: Vec<LockRecord> = locks
            .values()
            .filter(|record| record.is_live(now))
            .cloned()
            .collect();
        live.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(live)
    }
}
