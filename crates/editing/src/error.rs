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

//! Edit-session errors.

use quire_locks::LockError;
use thiserror::Error;

/// Result type for edit-session operations.
pub type EditResult<T> = Result<T, EditError>;

/// Errors returned by the edit-session service.
#[derive(Error, Debug)]
pub enum EditError {
    /// Document path failed the sanity check.
    #[error("Bad filename: {0}")]
    BadPath(String),

    /// Another session holds the document and the caller required the lock.
    #[error("Cannot lock {path}: held by {}", locked_by.as_deref().unwrap_or("another session"))]
    Conflict {
        /// Requested document.
        path: String,
        /// Current holder, if still locked when read.
        locked_by: Option<String>,
    },

    /// Storage or configuration failure from the lock store.
    #[error(transparent)]
    Lock(#[from] LockError),
}
