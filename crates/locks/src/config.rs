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

//! Lock store configuration.
//!
//! ## Environment Variables
//! - `QUIRE_LOCK_BACKEND`: `sqlite` (default), `in-memory` / `memory`
//! - `QUIRE_LOCK_SQLITE_PATH`: database file (default `data/locks/lockstore.sqlite`,
//!   `:memory:` for a private in-memory database)
//! - `QUIRE_LOCK_MAX_CONNECTIONS`: SQLite pool size (default 5)
//!
//! PostgreSQL, MySQL and Redis are recognised but rejected: the TTL lock
//! protocol is only implemented for the backends above. The rejection happens
//! here, when the store is built, never during a lock call.

use crate::{LockError, LockResult, LockStore, MemoryLockBackend};
use std::sync::Arc;
use tracing::info;

/// Default SQLite database path.
pub const DEFAULT_SQLITE_PATH: &str = "data/locks/lockstore.sqlite";

/// Default SQLite pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const UNSUPPORTED_DRIVERS: &[&str] = &["postgres", "postgresql", "mysql", "mariadb", "redis"];

/// Backend type configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendType {
    /// In-memory HashMap backend (tests, single process)
    InMemory,
    /// SQLite backend (requires sqlite-backend feature)
    Sqlite {
        /// Path to SQLite database file, or `:memory:`
        path: String,
        /// Connection pool size
        max_connections: u32,
    },
}

impl Default for BackendType {
    fn default() -> Self {
        Self::Sqlite {
            path: DEFAULT_SQLITE_PATH.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Lock store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockStoreConfig {
    /// Backend type
    pub backend: BackendType,
}

impl LockStoreConfig {
    /// Create configuration with explicit backend.
    pub fn new(backend: BackendType) -> Self {
        Self { backend }
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> LockResult<Self> {
        let backend_str = std::env::var("QUIRE_LOCK_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase();

        let backend = match backend_str.as_str() {
            "in-memory" | "memory" => BackendType::InMemory,

            "sqlite" => {
                let path = std::env::var("QUIRE_LOCK_SQLITE_PATH")
                    .unwrap_or_else(|_| DEFAULT_SQLITE_PATH.to_string());
                let max_connections = match std::env::var("QUIRE_LOCK_MAX_CONNECTIONS") {
                    Ok(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                        LockError::ConfigError(format!(
                            "QUIRE_LOCK_MAX_CONNECTIONS must be a positive integer, got '{}'",
                            raw
                        ))
                    })?,
                    Err(_) => DEFAULT_MAX_CONNECTIONS,
                };
                BackendType::Sqlite {
                    path,
                    max_connections,
                }
            }

            other => return Err(unsupported(other)),
        };

        Ok(Self { backend })
    }

    /// Create configuration from a database URL.
    ///
    /// Accepted forms: `memory:`, `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>`.
    ///
    /// ## Examples
    /// ```rust
    /// use quire_locks::{BackendType, LockStoreConfig};
    ///
    /// let config = LockStoreConfig::from_url("sqlite://data/locks.db").unwrap();
    /// assert!(matches!(config.backend, BackendType::Sqlite { .. }));
    ///
    /// assert!(LockStoreConfig::from_url("postgres://localhost/locks").is_err());
    /// ```
    pub fn from_url(database_url: &str) -> LockResult<Self> {
        let (scheme, rest) = database_url.split_once(':').ok_or_else(|| {
            LockError::ConfigError(format!("Invalid database URL: {}", database_url))
        })?;

        let backend = match scheme.to_lowercase().as_str() {
            "memory" => BackendType::InMemory,
            "sqlite" => {
                let path = rest.strip_prefix("//").unwrap_or(rest);
                if path.is_empty() {
                    return Err(LockError::ConfigError(format!(
                        "Missing SQLite path in database URL: {}",
                        database_url
                    )));
                }
                BackendType::Sqlite {
                    path: path.to_string(),
                    max_connections: DEFAULT_MAX_CONNECTIONS,
                }
            }
            other => return Err(unsupported(other)),
        };

        Ok(Self { backend })
    }
}

fn unsupported(driver: &str) -> LockError {
    if UNSUPPORTED_DRIVERS.contains(&driver) {
        LockError::ConfigError(format!(
            "TTL locks do not support the '{}' driver. Valid options: in-memory, sqlite",
            driver
        ))
    } else {
        LockError::ConfigError(format!(
            "Unknown backend type: {}. Valid options: in-memory, sqlite",
            driver
        ))
    }
}

/// Build and initialize a lock store from environment variables.
pub async fn create_lock_store_from_env() -> LockResult<LockStore> {
    let config = LockStoreConfig::from_env()?;
    create_lock_store_from_config(config).await
}

/// Build a lock store from `config` and make sure its table exists.
pub async fn create_lock_store_from_config(config: LockStoreConfig) -> LockResult<LockStore> {
    let store = match config.backend {
        BackendType::InMemory => LockStore::new(Arc::new(MemoryLockBackend::new())),

        #[cfg(feature = "sqlite-backend")]
        BackendType::Sqlite {
            path,
            max_connections,
        } => {
            use crate::sql::SqliteLockBackend;
            let backend = SqliteLockBackend::open(&path, max_connections).await?;
            LockStore::new(Arc::new(backend))
        }

        #[cfg(not(feature = "sqlite-backend"))]
        BackendType::Sqlite { .. } => {
            return Err(LockError::ConfigError(
                "SQLite backend requires 'sqlite-backend' feature".to_string(),
            ))
        }
    };

    store.initialize().await?;
    info!(backend = store.backend_kind(), "lock store ready");
    Ok(store)
}
