// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for DarkGPT.
//!
//! [`Orchestrator`] turns a rendered conversation into one assistant reply,
//! running web search tool calls on the model's behalf. [`ChatSession`]
//! wraps it with the per-user send flow: single-flight sends, optimistic
//! display of unconfirmed writes and reconciliation against the store.

pub mod attachment;
pub mod cache;
pub mod history;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod shutdown;

pub use cache::ConversationCache;
pub use orchestrator::{Orchestrator, OrchestratorSettings};
pub use session::{ChatSession, SessionDeps, SessionRegistry, SessionSettings, SessionState};
