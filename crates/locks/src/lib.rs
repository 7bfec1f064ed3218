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

//! # Quire Named Locks
//!
//! ## Purpose
//! Gives exactly one editing session exclusive, time-bounded write access to a
//! named resource (a documentation file path). State lives in a shared
//! persistent store, so every backend process sees the same locks.
//!
//! ## Architecture Context
//! The HTTP layer of the editing backend asks a [`LockStore`] for a
//! [`NamedLock`] by file path and calls `lock` / `unlock` / the queries on it.
//! Nothing else depends on this crate.
//!
//! ## Design Decisions
//! - **One protocol, many stores**: [`NamedLock`] implements the locking rules
//!   once; [`LockBackend`] adapters only store rows
//! - **Atomic conditional write**: acquisition is a single check-and-set in the
//!   store, never a read followed by a write
//! - **Expiry at query time**: an expired row is simply not live; pruning is
//!   housekeeping, not correctness
//! - **One clock reading per operation** through [`Clock`]
//! - **Contention is a value**: a rejected `lock()` returns `false`; only
//!   storage and configuration problems are errors
//!
//! ## Backend Support
//!
//! - **InMemory**: HashMap-based (always available, for testing)
//! - **SQLite**: Persistent, shared between processes (feature: `sqlite-backend`)
//!
//! ## Examples
//!
//! ```rust
//! use quire_locks::{LockStore, MemoryLockBackend};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LockStore::new(Arc::new(MemoryLockBackend::new()));
//! store.initialize().await?;
//!
//! let lock = store.for_name("docs/getting-started.md");
//! assert!(lock.lock("alice", 15 * 60).await?);
//! assert!(!lock.lock("bob", 15 * 60).await?);
//! assert_eq!(lock.locked_by().await?.as_deref(), Some("alice"));
//!
//! lock.unlock("alice").await?;
//! assert!(!lock.is_locked().await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod memory;
pub mod store;

#[cfg(feature = "sqlite-backend")]
pub mod sql;

pub use backend::{LockBackend, LockRecord};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    create_lock_store_from_config, create_lock_store_from_env, BackendType, LockStoreConfig,
};
pub use error::{LockError, LockResult};
pub use memory::MemoryLockBackend;
pub use store::{LockStatus, LockStore, NamedLock};

#[cfg(feature = "sqlite-backend")]
pub use sql::SqliteLockBackend;
