// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for DarkGPT.
//!
//! WAL-mode SQLite with embedded migrations behind a single
//! `tokio-rusqlite` connection, typed queries for messages and users, and a
//! fire-and-forget [`MessageWriter`] that publishes a notification when each
//! append is confirmed or fails.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod writer;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use writer::{MessageWriter, StoreEvent};
