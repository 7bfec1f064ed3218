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

//! Error types for named lock operations.
//!
//! Contention is not an error: a rejected `lock()` returns `Ok(false)`. Only
//! setup problems and storage faults surface here.

use thiserror::Error;

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Errors that can occur while building or using a lock store.
#[derive(Error, Debug)]
pub enum LockError {
    /// Unsupported backend/driver or invalid configuration.
    ///
    /// Only produced while constructing a store, never by lock operations.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading or writing the backing store failed (I/O, connectivity, corruption).
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<std::io::Error> for LockError {
    fn from(err: std::io::Error) -> Self {
        LockError::StorageError(format!("IO error: {}", err))
    }
}

#[cfg(feature = "sqlite-backend")]
impl From<sqlx::Error> for LockError {
    fn from(err: sqlx::Error) -> Self {
        LockError::StorageError(format!("SQL error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_storage_error() {
        let err: LockError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, LockError::StorageError(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_config_error_display() {
        let err = LockError::ConfigError("postgres is not supported".to_string());
        assert_eq!(err.to_string(), "Configuration error: postgres is not supported");
    }
}
