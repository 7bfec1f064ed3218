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

//! # Quire Edit Sessions
//!
//! ## Purpose
//! Edit-session policy on top of [`quire_locks`]: which documents may be
//! locked, for how long, and how a lock attempt is reported back to the
//! editing frontend.
//!
//! ## Examples
//!
//! ```rust
//! use quire_editing::{EditLockConfig, EditLockService};
//! use quire_locks::{LockStore, MemoryLockBackend};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LockStore::new(Arc::new(MemoryLockBackend::new()));
//! let service = EditLockService::new(store, EditLockConfig::default());
//!
//! let outcome = service.acquire("guide/install.md", "alice").await?;
//! assert!(outcome.success);
//! assert_eq!(outcome.status_code(), 200);
//!
//! let outcome = service.acquire("guide/install.md", "bob").await?;
//! assert_eq!(outcome.status_code(), 409);
//! assert_eq!(outcome.locked_by.as_deref(), Some("alice"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod path;
pub mod service;

pub use config::{EditLockConfig, DEFAULT_LOCK_TTL_SECS};
pub use error::{EditError, EditResult};
pub use path::validate_document_path;
pub use service::{EditLockService, LockOutcome};
