// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use darkgpt_config::model::StorageConfig;
use darkgpt_core::types::{Message, UserRecord};
use darkgpt_core::{AdapterType, DarkgptError, HealthStatus, PluginAdapter, StorageAdapter};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened by [`StorageAdapter::initialize`]; until then every
/// operation fails with [`DarkgptError::PersistenceUnavailable`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, DarkgptError> {
        self.db.get().ok_or_else(|| {
            DarkgptError::PersistenceUnavailable(
                "storage not initialized; call initialize() first".into(),
            )
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, DarkgptError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        db.connection()
            .call(|conn| conn.query_row("SELECT 1", [], |_| Ok(())))
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DarkgptError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), DarkgptError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| DarkgptError::Internal("storage already initialized".into()))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), DarkgptError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Message operations ---

    async fn append_message(&self, message: &Message) -> Result<Message, DarkgptError> {
        queries::messages::append_message(self.db()?, message).await
    }

    async fn recent_messages(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, DarkgptError> {
        queries::messages::recent_messages(self.db()?, user_id, limit).await
    }

    async fn clear_messages(&self, user_id: &str) -> Result<usize, DarkgptError> {
        queries::messages::clear_messages(self.db()?, user_id).await
    }

    // --- User operations ---

    async fn create_user(&self, user: &UserRecord) -> Result<(), DarkgptError> {
        queries::users::create_user(self.db()?, user).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DarkgptError> {
        queries::users::get_user_by_email(self.db()?, email).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DarkgptError> {
        queries::users::get_user(self.db()?, id).await
    }
}
