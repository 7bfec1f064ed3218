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

//! Edit-session lock service.
//!
//! The HTTP layer maps one request to one call here: `acquire` for the lock
//! endpoint, `release` for unlock, `ensure_locked` before persisting a save.
//! The session user name is the lock holder and the document path is the
//! lock name.

use crate::{validate_document_path, EditError, EditLockConfig, EditResult};
use quire_locks::LockStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Result of an acquire, shaped for the JSON response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockOutcome {
    /// Whether the caller now holds the lock.
    pub success: bool,
    /// Holder after the attempt: the caller on success, the incumbent otherwise.
    pub locked_by: Option<String>,
    /// Absolute expiry in epoch seconds.
    pub locked_until: Option<i64>,
}

impl LockOutcome {
    /// HTTP status for the response: 200 when locked, 409 on conflict.
    pub fn status_code(&self) -> u16 {
        if self.success {
            200
        } else {
            409
        }
    }
}

/// Edit-session policy over a shared [`LockStore`].
#[derive(Debug, Clone)]
pub struct EditLockService {
    store: LockStore,
    ttl_secs: i64,
}

impl EditLockService {
    /// Service over `store` applying the TTL from `config`.
    pub fn new(store: LockStore, config: EditLockConfig) -> Self {
        Self {
            store,
            ttl_secs: config.ttl_secs,
        }
    }

    /// Lock duration applied by every acquire.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Underlying lock store.
    pub fn store(&self) -> &LockStore {
        &self.store
    }

    /// Lock `path` for `user`, or renew the lock `user` already holds.
    #[instrument(skip(self))]
    pub async fn acquire(&self, path: &str, user: &str) -> EditResult<LockOutcome> {
        validate_document_path(path)?;

        let lock = self.store.for_name(path);
        let success = lock.lock(user, self.ttl_secs).await?;
        let status = lock.status().await?;

        debug!(success, locked_by = ?status.holder, "edit lock requested");
        Ok(LockOutcome {
            success,
            locked_by: status.holder,
            locked_until: status.expires_at,
        })
    }

    /// Give up `user`'s lock on `path`. Not holding it is not an error.
    #[instrument(skip(self))]
    pub async fn release(&self, path: &str, user: &str) -> EditResult<()> {
        validate_document_path(path)?;
        self.store.for_name(path).unlock(user).await?;
        Ok(())
    }

    /// Acquire or renew, failing with [`EditError::Conflict`] when someone
    /// else holds `path`.
    pub async fn ensure_locked(&self, path: &str, user: &str) -> EditResult<()> {
        let outcome = self.acquire(path, user).await?;
        if outcome.success {
            Ok(())
        } else {
            Err(EditError::Conflict {
                path: path.to_string(),
                locked_by: outcome.locked_by,
            })
        }
    }
}
