// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-phase conversation cache.
//!
//! Holds the store-confirmed messages of one conversation together with the
//! messages written optimistically but not yet confirmed. Confirmation moves
//! a message from pending to confirmed and adopts the store's timestamp; a
//! failed write drops the pending entry.
//!
//! The cache keeps at most `limit` messages, the same window a reload pulls
//! from the store. The oldest confirmed messages are evicted first; pending
//! ones are always the newest turns and stay until resolved.

use darkgpt_core::types::timestamp_now;
use darkgpt_core::{Message, Role};

/// Id of the synthetic greeting shown for an empty conversation.
pub const GREETING_ID: &str = "greeting";

#[derive(Debug, Clone)]
pub struct ConversationCache {
    confirmed: Vec<Message>,
    pending: Vec<Message>,
    greeting: String,
    limit: usize,
}

impl ConversationCache {
    pub fn new(greeting: impl Into<String>, limit: usize) -> Self {
        Self {
            confirmed: Vec::new(),
            pending: Vec::new(),
            greeting: greeting.into(),
            limit,
        }
    }

    /// Replaces the confirmed half with a fresh query result. Pending entries
    /// that the result already contains are dropped.
    pub fn replace_confirmed(&mut self, messages: Vec<Message>) {
        self.pending
            .retain(|p| !messages.iter().any(|m| m.id == p.id));
        self.confirmed = messages;
        self.trim();
    }

    /// Records an optimistic write.
    pub fn push_pending(&mut self, message: Message) {
        self.pending.push(message);
        self.trim();
    }

    /// Moves a message to the confirmed half. Messages confirmed without a
    /// pending entry (written elsewhere) are added as well. Returns whether
    /// a pending entry was resolved.
    pub fn confirm(&mut self, stored: Message) -> bool {
        let was_pending = self.remove_pending(&stored.id).is_some();
        match self.confirmed.iter_mut().find(|m| m.id == stored.id) {
            Some(existing) => *existing = stored,
            None => {
                self.confirmed.push(stored);
                self.confirmed
                    .sort_by(|a, b| a.created_at.cmp(&b.created_at));
            }
        }
        self.trim();
        was_pending
    }

    /// Drops a pending entry whose write failed.
    pub fn rollback(&mut self, message_id: &str) -> Option<Message> {
        self.remove_pending(message_id)
    }

    /// Confirmed messages by `created_at`, followed by pending messages in
    /// the order they were written. Pending entries are always the newest
    /// turns, and their local timestamps may precede the store-assigned
    /// timestamp of an earlier turn.
    pub fn merged(&self) -> Vec<Message> {
        self.confirmed
            .iter()
            .chain(self.pending.iter())
            .cloned()
            .collect()
    }

    /// What a client renders: the merged view, or the greeting alone when
    /// the conversation is empty. The greeting is never persisted.
    pub fn view(&self) -> Vec<Message> {
        let merged = self.merged();
        if merged.is_empty() {
            return vec![self.greeting_message()];
        }
        merged
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn confirmed_len(&self) -> usize {
        self.confirmed.len()
    }

    fn greeting_message(&self) -> Message {
        Message {
            id: GREETING_ID.to_string(),
            role: Role::Assistant,
            content: self.greeting.clone(),
            created_at: timestamp_now(),
            image: None,
            user_id: None,
        }
    }

    fn trim(&mut self) {
        let excess = (self.confirmed.len() + self.pending.len()).saturating_sub(self.limit);
        let evict = excess.min(self.confirmed.len());
        self.confirmed.drain(..evict);
    }

    fn remove_pending(&mut self, message_id: &str) -> Option<Message> {
        let idx = self.pending.iter().position(|m| m.id == message_id)?;
        Some(self.pending.remove(idx))
    }
}
