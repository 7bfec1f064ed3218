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

//! Behavioural contract every lock backend must satisfy.
//!
//! Each check runs against a fresh lock name, so the same store can be reused
//! across checks. Timing checks use the wall clock with whole-second
//! resolution; bounds are inclusive of one second of drift.

#![allow(dead_code)]

use quire_locks::LockStore;
use tokio::time::{sleep, Duration};

const HOLDER_A: &str = "holder-a";
const HOLDER_B: &str = "holder-b";

pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, ulid::Ulid::new())
}

/// Handles carry their name and two handles for one name are interchangeable.
pub async fn check_names_and_fungibility(store: &LockStore) {
    let name = unique_name("named");
    let first = store.for_name(name.clone());
    let second = store.for_name(name.clone());
    assert_eq!(first.name(), name);

    assert!(first.lock(HOLDER_A, 30).await.unwrap());
    assert!(second.is_locked().await.unwrap());
    assert_eq!(second.locked_by().await.unwrap().as_deref(), Some(HOLDER_A));
    assert!(!second.lock(HOLDER_B, 30).await.unwrap());

    second.unlock(HOLDER_A).await.unwrap();
    assert!(!first.is_locked().await.unwrap());
}

/// Full lock / contend / renew / release cycle.
pub async fn check_lock_cycle(store: &LockStore) {
    let lock = store.for_name(unique_name("cycle"));

    assert!(!lock.is_locked().await.unwrap());
    assert_eq!(lock.locked_by().await.unwrap(), None);
    assert_eq!(lock.locked_for().await.unwrap(), 0);

    assert!(lock.lock(HOLDER_A, 4).await.unwrap());
    assert!(lock.is_locked().await.unwrap());
    assert_eq!(lock.locked_by().await.unwrap().as_deref(), Some(HOLDER_A));
    assert!((3..=4).contains(&lock.locked_for().await.unwrap()));

    // Relocking by the holder succeeds.
    assert!(lock.lock(HOLDER_A, 4).await.unwrap());

    // Contender is rejected and the incumbent is untouched.
    assert!(!lock.lock(HOLDER_B, 60).await.unwrap());
    assert_eq!(lock.locked_by().await.unwrap().as_deref(), Some(HOLDER_A));
    assert!(lock.locked_for().await.unwrap() <= 4);

    // Unlock by a non-holder is a silent no-op.
    lock.unlock(HOLDER_B).await.unwrap();
    assert_eq!(lock.locked_by().await.unwrap().as_deref(), Some(HOLDER_A));

    lock.unlock(HOLDER_A).await.unwrap();
    assert!(!lock.is_locked().await.unwrap());
    assert_eq!(lock.locked_for().await.unwrap(), 0);

    // Unlocking an unlocked name is fine too.
    lock.unlock(HOLDER_A).await.unwrap();

    assert!(lock.lock(HOLDER_B, 4).await.unwrap());
    assert_eq!(lock.locked_by().await.unwrap().as_deref(), Some(HOLDER_B));
    lock.unlock(HOLDER_B).await.unwrap();
}

/// Remaining time strictly decreases until it reaches 0, then stays there.
pub async fn check_ttl_decreases(store: &LockStore) {
    let lock = store.for_name(unique_name("countdown"));

    assert!(lock.lock(HOLDER_A, 3).await.unwrap());
    let mut previous = lock.locked_for().await.unwrap();
    assert!((2..=3).contains(&previous));

    while previous > 0 {
        sleep(Duration::from_millis(1100)).await;
        let remaining = lock.locked_for().await.unwrap();
        assert!(
            remaining < previous,
            "expected countdown below {previous}s, got {remaining}s"
        );
        previous = remaining;
    }

    assert!(!lock.is_locked().await.unwrap());
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(lock.locked_for().await.unwrap(), 0);
}

/// Renewal sets the TTL to the new value, including a shorter one.
pub async fn check_relock_resets_ttl(store: &LockStore) {
    let lock = store.for_name(unique_name("renew"));

    assert!(lock.lock(HOLDER_A, 4).await.unwrap());
    assert!((3..=4).contains(&lock.locked_for().await.unwrap()));

    assert!(lock.lock(HOLDER_A, 30).await.unwrap());
    assert!((29..=30).contains(&lock.locked_for().await.unwrap()));

    assert!(lock.lock(HOLDER_A, 4).await.unwrap());
    assert!((3..=4).contains(&lock.locked_for().await.unwrap()));

    lock.unlock(HOLDER_A).await.unwrap();
}

/// An expired lock reads as unlocked and is free for anyone.
pub async fn check_expiry(store: &LockStore) {
    let lock = store.for_name(unique_name("expiry"));

    assert!(lock.lock(HOLDER_A, 2).await.unwrap());
    let remaining = lock.locked_for().await.unwrap();
    sleep(Duration::from_secs(remaining + 1)).await;

    assert!(!lock.is_locked().await.unwrap());
    assert_eq!(lock.locked_by().await.unwrap(), None);
    assert_eq!(lock.locked_for().await.unwrap(), 0);

    assert!(lock.lock(HOLDER_B, 30).await.unwrap());
    assert_eq!(lock.locked_by().await.unwrap().as_deref(), Some(HOLDER_B));
    lock.unlock(HOLDER_B).await.unwrap();
}

/// Zero and negative TTLs are refused without touching the lock.
pub async fn check_rejects_non_positive_ttl(store: &LockStore) {
    let lock = store.for_name(unique_name("ttl"));

    assert!(!lock.lock(HOLDER_A, 0).await.unwrap());
    assert!(!lock.lock(HOLDER_A, -5).await.unwrap());
    assert!(!lock.is_locked().await.unwrap());

    assert!(lock.lock(HOLDER_A, 30).await.unwrap());
    assert!(!lock.lock(HOLDER_A, 0).await.unwrap());
    assert!((29..=30).contains(&lock.locked_for().await.unwrap()));
    lock.unlock(HOLDER_A).await.unwrap();
}

/// Many contenders at once: exactly one wins.
pub async fn check_single_winner(store: &LockStore, contenders: usize) {
    let name = unique_name("race");

    let handles: Vec<_> = (0..contenders)
        .map(|i| {
            let lock = store.for_name(name.clone());
            tokio::spawn(async move {
                let holder = format!("holder-{i}");
                let acquired = lock.lock(&holder, 30).await.unwrap();
                (holder, acquired)
            })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        let (holder, acquired) = handle.await.unwrap();
        if acquired {
            winners.push(holder);
        }
    }

    assert_eq!(winners.len(), 1, "winners: {winners:?}");
    let lock = store.for_name(name);
    assert_eq!(lock.locked_by().await.unwrap(), winners.pop());
}

/// Two editors on one document.
pub async fn check_editor_scenario(store: &LockStore) {
    let lock = store.for_name(unique_name("my-resource"));

    assert!(lock.lock("alice", 900).await.unwrap());
    assert!(!lock.lock("bob", 900).await.unwrap());

    let status = lock.status().await.unwrap();
    assert_eq!(status.holder.as_deref(), Some("alice"));
    assert!((899..=900).contains(&status.locked_for));
    assert!(status.expires_at.unwrap() > store.now());

    lock.unlock("alice").await.unwrap();
    assert!(lock.lock("bob", 900).await.unwrap());
    assert_eq!(lock.locked_by().await.unwrap().as_deref(), Some("bob"));
    lock.unlock("bob").await.unwrap();
}

/// Every check in sequence.
pub async fn run_contract(store: &LockStore) {
    check_names_and_fungibility(store).await;
    check_lock_cycle(store).await;
    check_ttl_decreases(store).await;
    check_relock_resets_ttl(store).await;
    check_expiry(store).await;
    check_rejects_non_positive_ttl(store).await;
    check_single_winner(store, 10).await;
    check_editor_scenario(store).await;
}
