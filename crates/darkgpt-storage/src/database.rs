// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management: PRAGMA setup, migrations, checkpointing.
//!
//! Every statement runs on `tokio-rusqlite`'s single background thread, which
//! makes [`Database`] the only writer. Do not open further connections for
//! writes.

use std::path::Path;

use darkgpt_core::DarkgptError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into [`DarkgptError::Storage`].
pub(crate) fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> DarkgptError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DarkgptError::storage(e)
}

/// Handle to an open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` in WAL mode.
    pub async fn open(path: &str) -> Result<Self, DarkgptError> {
        Self::open_with(path, true).await
    }

    /// Opens the database, choosing the journal mode, and runs migrations.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, DarkgptError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(DarkgptError::storage)?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(DarkgptError::storage)?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            let journal_mode = if wal_mode { "WAL" } else { "DELETE" };
            conn.pragma_update(None, "journal_mode", journal_mode)?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// The underlying connection. Query modules call through this.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Truncating WAL checkpoint, used on close and shutdown.
    pub async fn checkpoint(&self) -> Result<(), DarkgptError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
