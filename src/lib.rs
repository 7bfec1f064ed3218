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

//! Quire: named distributed locks for collaborative documentation editing
//!
//! Core design philosophy:
//! - One editor per document at a time, enforced through a shared store
//! - Locks expire on their own; an abandoned session never blocks a page forever
//! - Contention is an answer, not a failure
//!
//! Crates:
//! 1. [`locks`]: the named TTL lock primitive and its storage backends
//! 2. [`editing`]: edit-session policy used by the HTTP layer

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use quire_editing as editing;
pub use quire_locks as locks;

// Re-export core types for convenience
pub use editing::{EditError, EditLockConfig, EditLockService, LockOutcome};
pub use locks::{LockError, LockStatus, LockStore, LockStoreConfig, NamedLock};
