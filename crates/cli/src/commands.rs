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

//! Lock commands.

use anyhow::{Context, Result};
use quire_locks::{
    create_lock_store_from_config, create_lock_store_from_env, LockStatus, LockStore,
    LockStoreConfig,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct InitReport {
    pub backend: &'static str,
    pub ready: bool,
}

#[derive(Debug, Serialize)]
pub struct LockReport {
    pub acquired: bool,
    #[serde(flatten)]
    pub status: LockStatus,
}

#[derive(Debug, Serialize)]
pub struct PruneReport {
    pub pruned: u64,
}

/// Open (and initialize) the store named by `database`, or the one the
/// environment configures.
pub async fn open_store(database: Option<&str>) -> Result<LockStore> {
    let store = match database {
        Some(url) => {
            let config = LockStoreConfig::from_url(url).context("Invalid database URL")?;
            create_lock_store_from_config(config).await
        }
        None => create_lock_store_from_env().await,
    }
    .context("Failed to open lock store")?;

    Ok(store)
}

pub fn init(store: &LockStore) -> InitReport {
    InitReport {
        backend: store.backend_kind(),
        ready: true,
    }
}

pub async fn status(store: &LockStore, name: &str) -> Result<LockStatus> {
    store
        .for_name(name)
        .status()
        .await
        .context("Failed to read lock")
}

pub async fn lock(store: &LockStore, name: &str, holder: &str, ttl: i64) -> Result<LockReport> {
    let lock = store.for_name(name);
    let acquired = lock.lock(holder, ttl).await.context("Failed to lock")?;
    let status = lock.status().await.context("Failed to read lock")?;

    if acquired {
        info!(name, holder, ttl, "lock acquired");
    } else {
        info!(name, holder, incumbent = ?status.holder, "lock rejected");
    }
    Ok(LockReport { acquired, status })
}

pub async fn unlock(store: &LockStore, name: &str, holder: &str) -> Result<LockStatus> {
    let lock = store.for_name(name);
    lock.unlock(holder).await.context("Failed to unlock")?;
    lock.status().await.context("Failed to read lock")
}

pub async fn list(store: &LockStore) -> Result<Vec<LockStatus>> {
    store.list_live().await.context("Failed to list locks")
}

pub async fn prune(store: &LockStore) -> Result<PruneReport> {
    let pruned = store.prune_expired().await.context("Failed to prune locks")?;
    info!(pruned, "pruned expired locks");
    Ok(PruneReport { pruned })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> LockStore {
        open_store(Some("memory:")).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_store_rejects_unsupported_url() {
        let err = open_store(Some("postgres://localhost/locks")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("postgres"));
    }

    #[tokio::test]
    async fn test_lock_report() {
        let store = memory_store().await;

        let report = lock(&store, "guide/intro.md", "alice", 60).await.unwrap();
        assert!(report.acquired);
        assert_eq!(report.status.holder.as_deref(), Some("alice"));

        let report = lock(&store, "guide/intro.md", "bob", 60).await.unwrap();
        assert!(!report.acquired);
        assert_eq!(report.status.holder.as_deref(), Some("alice"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["acquired"], false);
        assert_eq!(json["name"], "guide/intro.md");
        assert_eq!(json["holder"], "alice");
    }

    #[tokio::test]
    async fn test_unlock_list_prune() {
        let store = memory_store().await;
        assert_eq!(init(&store).backend, "memory");

        lock(&store, "a.md", "alice", 60).await.unwrap();
        lock(&store, "b.md", "bob", 60).await.unwrap();
        assert_eq!(list(&store).await.unwrap().len(), 2);

        let after = unlock(&store, "a.md", "alice").await.unwrap();
        assert!(!after.is_locked());
        assert_eq!(status(&store, "b.md").await.unwrap().holder.as_deref(), Some("bob"));

        assert_eq!(prune(&store).await.unwrap().pruned, 0);
        assert_eq!(list(&store).await.unwrap().len(), 1);
    }
}
