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

//! Edit-session configuration.
//!
//! ## Environment Variables
//! - `QUIRE_EDIT_LOCK_TTL_SECS`: how long a document stays locked after each
//!   acquire (default 900, must be at least 1)

use quire_locks::{LockError, LockResult};

/// Number of seconds a document remains locked after an acquire.
pub const DEFAULT_LOCK_TTL_SECS: i64 = 15 * 60;

/// Edit-session lock configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditLockConfig {
    /// Seconds a document stays locked after each acquire.
    pub ttl_secs: i64,
}

impl Default for EditLockConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_LOCK_TTL_SECS,
        }
    }
}

impl EditLockConfig {
    /// Load from environment variables.
    pub fn from_env() -> LockResult<Self> {
        let ttl_secs = match std::env::var("QUIRE_EDIT_LOCK_TTL_SECS") {
            Ok(raw) => raw.trim().parse::<i64>().ok().filter(|ttl| *ttl >= 1).ok_or_else(|| {
                LockError::ConfigError(format!(
                    "QUIRE_EDIT_LOCK_TTL_SECS must be a positive number of seconds, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_LOCK_TTL_SECS,
        };

        Ok(Self { ttl_secs })
    }
}
