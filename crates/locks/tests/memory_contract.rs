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

//! In-memory backend against the shared lock contract.

mod common;

use quire_locks::{LockStore, MemoryLockBackend};
use std::sync::Arc;

async fn create_store() -> LockStore {
    let store = LockStore::new(Arc::new(MemoryLockBackend::new()));
    store.initialize().await.unwrap();
    store
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_contract() {
    let store = create_store().await;
    common::run_contract(&store).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_single_winner_under_load() {
    let store = create_store().await;
    common::check_single_winner(&store, 50).await;
}

#[tokio::test]
async fn test_memory_stores_from_cloned_backend_agree() {
    let backend = MemoryLockBackend::new();
    let first = LockStore::new(Arc::new(backend.clone()));
    let second = LockStore::new(Arc::new(backend));

    let name = common::unique_name("shared");
    assert!(first.for_name(name.clone()).lock("alice", 60).await.unwrap());
    assert!(!second.for_name(name.clone()).lock("bob", 60).await.unwrap());
    assert_eq!(
        second.for_name(name).locked_by().await.unwrap().as_deref(),
        Some("alice")
    );
}
