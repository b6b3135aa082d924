// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends.

use async_trait::async_trait;

use crate::error::DarkgptError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Message, UserRecord};

/// Adapter for the message store and user profiles.
///
/// Messages are append-only: there is no edit and no per-message delete.
/// Every method fails with [`DarkgptError::PersistenceUnavailable`] before
/// [`initialize`](StorageAdapter::initialize) has succeeded.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), DarkgptError>;

    /// Closes the storage backend and releases the connection.
    async fn close(&self) -> Result<(), DarkgptError>;

    // --- Message operations ---

    /// Appends a message to its owner's conversation.
    ///
    /// Returns the stored message; its `created_at` is assigned by the store
    /// and is never earlier than the owner's latest message.
    async fn append_message(&self, message: &Message) -> Result<Message, DarkgptError>;

    /// Returns the most recent `limit` messages of a user, oldest first.
    async fn recent_messages(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, DarkgptError>;

    /// Deletes every message of a user. Administrative use only.
    async fn clear_messages(&self, user_id: &str) -> Result<usize, DarkgptError>;

    // --- User operations ---

    /// Creates a user. Fails with [`DarkgptError::Auth`] if the email is taken.
    async fn create_user(&self, user: &UserRecord) -> Result<(), DarkgptError>;

    /// Looks up a user by (lowercased) email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DarkgptError>;

    /// Looks up a user by id.
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DarkgptError>;
}
