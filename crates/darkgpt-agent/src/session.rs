// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user chat session.
//!
//! Each send goes through states: Idle -> Sending -> AwaitingBackend -> Idle.
//! Only one send may be in flight per session. Writes go through the
//! fire-and-forget [`MessageWriter`]; the session shows them immediately from
//! its [`ConversationCache`] and reconciles once the store reports back.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use darkgpt_config::DarkgptConfig;
use darkgpt_core::types::ChatRequest;
use darkgpt_core::{DarkgptError, Message, Role, StorageAdapter};
use darkgpt_storage::{MessageWriter, StoreEvent};
use tokio::sync::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::attachment::parse_data_uri;
use crate::cache::ConversationCache;
use crate::history::format_history;
use crate::orchestrator::Orchestrator;

/// States of the send flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready to accept a message.
    Idle,
    /// User turn accepted and shown optimistically.
    Sending,
    /// Waiting on the AI backend.
    AwaitingBackend,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionState::Sending,
            2 => SessionState::AwaitingBackend,
            _ => SessionState::Idle,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Sending => write!(f, "sending"),
            SessionState::AwaitingBackend => write!(f, "awaiting_backend"),
        }
    }
}

/// Session tunables.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub history_limit: usize,
    pub greeting: String,
}

impl SessionSettings {
    pub fn from_config(config: &DarkgptConfig) -> Self {
        Self {
            history_limit: config.chat.history_limit,
            greeting: config.chat.greeting.clone(),
        }
    }
}

/// Shared dependencies of every session.
#[derive(Clone)]
pub struct SessionDeps {
    pub orchestrator: Arc<Orchestrator>,
    pub storage: Arc<dyn StorageAdapter>,
    pub writer: MessageWriter,
    pub settings: SessionSettings,
}

/// Conversation state and send flow for one user.
pub struct ChatSession {
    user_id: String,
    deps: SessionDeps,
    busy: AtomicBool,
    state: AtomicU8,
    cache: Mutex<ConversationCache>,
}

/// Clears the busy flag and returns the session to idle when dropped.
struct SendGuard<'a> {
    session: &'a ChatSession,
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.session.set_state(SessionState::Idle);
        self.session.busy.store(false, Ordering::Release);
    }
}

impl ChatSession {
    pub fn new(user_id: impl Into<String>, deps: SessionDeps) -> Self {
        let cache = ConversationCache::new(
            deps.settings.greeting.clone(),
            deps.settings.history_limit,
        );
        Self {
            user_id: user_id.into(),
            deps,
            busy: AtomicBool::new(false),
            state: AtomicU8::new(SessionState::Idle as u8),
            cache: Mutex::new(cache),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: SessionState) {
        debug!(user_id = %self.user_id, state = %state, "session state");
        self.state.store(state as u8, Ordering::Release);
    }

    /// Pulls the most recent messages from the store, keeping writes that
    /// are not yet confirmed.
    ///
    /// The cache stays locked across the query so store events arriving
    /// meanwhile are applied on top of the snapshot instead of under it.
    pub async fn load(&self) -> Result<(), DarkgptError> {
        let mut cache = self.cache.lock().await;
        let messages = self
            .deps
            .storage
            .recent_messages(&self.user_id, self.deps.settings.history_limit)
            .await?;
        debug!(user_id = %self.user_id, count = messages.len(), "conversation loaded");
        cache.replace_confirmed(messages);
        Ok(())
    }

    /// The conversation as a client renders it.
    pub async fn messages(&self) -> Vec<Message> {
        self.cache.lock().await.view()
    }

    /// Sends one user turn and returns the assistant's reply.
    ///
    /// The user turn is written before the backend is called and stays
    /// written if the backend fails; no assistant turn is written then.
    pub async fn send(
        &self,
        text: &str,
        image: Option<String>,
        use_web_search: bool,
    ) -> Result<Message, DarkgptError> {
        let text = text.trim();
        if text.is_empty() && image.is_none() {
            return Err(DarkgptError::Validation(
                "message must contain text or an image".into(),
            ));
        }
        if let Some(uri) = &image {
            parse_data_uri(uri, self.deps.orchestrator.settings().max_image_bytes)?;
        }

        let _guard = self.try_begin()?;
        self.set_state(SessionState::Sending);

        let user_message = Message::new(&self.user_id, Role::User, text, image.clone());
        let chat_history = {
            let mut cache = self.cache.lock().await;
            self.write(&mut cache, user_message)?;
            format_history(&cache.merged())
        };

        self.set_state(SessionState::AwaitingBackend);
        let request = ChatRequest {
            chat_history,
            image,
            use_web_search,
        };
        let reply = match self.deps.orchestrator.generate(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "turn failed");
                return Err(e);
            }
        };

        let assistant = Message::new(&self.user_id, Role::Assistant, reply.response, None);
        let mut cache = self.cache.lock().await;
        self.write(&mut cache, assistant.clone())?;
        info!(user_id = %self.user_id, message_id = %assistant.id, "turn completed");
        Ok(assistant)
    }

    /// Applies a store notification to the cache. Events for other users are
    /// ignored.
    pub async fn apply_store_event(&self, event: &StoreEvent) {
        if event.user_id() != Some(self.user_id.as_str()) {
            return;
        }
        let mut cache = self.cache.lock().await;
        match event {
            StoreEvent::Confirmed(message) => {
                cache.confirm(message.clone());
            }
            StoreEvent::Failed {
                message_id, error, ..
            } => {
                if cache.rollback(message_id).is_some() {
                    warn!(
                        user_id = %self.user_id,
                        message_id = %message_id,
                        error = %error,
                        "write failed, optimistic message rolled back"
                    );
                }
            }
        }
    }

    /// Feeds the writer's notifications into this session until the writer
    /// stops or the session is dropped.
    pub fn spawn_reconciler(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.deps.writer.subscribe();
        let session: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                let event = events.recv().await;
                let Some(session) = session.upgrade() else {
                    break;
                };
                match event {
                    Ok(event) => session.apply_store_event(&event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(user_id = %session.user_id, skipped, "reconciler lagged, reloading");
                        if let Err(e) = session.load().await {
                            warn!(user_id = %session.user_id, error = %e, "reload failed");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn try_begin(&self) -> Result<SendGuard<'_>, DarkgptError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DarkgptError::SessionBusy)?;
        Ok(SendGuard { session: self })
    }

    /// Shows `message` optimistically and queues its write. The cache lock is
    /// held so the confirmation cannot overtake the pending entry.
    fn write(&self, cache: &mut ConversationCache, message: Message) -> Result<(), DarkgptError> {
        let id = message.id.clone();
        cache.push_pending(message.clone());
        if let Err(e) = self.deps.writer.append(message) {
            cache.rollback(&id);
            return Err(e);
        }
        Ok(())
    }
}

/// Sessions by user id, created and loaded on first use.
pub struct SessionRegistry {
    deps: SessionDeps,
    sessions: DashMap<String, Arc<ChatSession>>,
}

impl SessionRegistry {
    pub fn new(deps: SessionDeps) -> Self {
        Self {
            deps,
            sessions: DashMap::new(),
        }
    }

    /// Returns the user's session, creating and loading it if needed.
    pub async fn get_or_load(&self, user_id: &str) -> Result<Arc<ChatSession>, DarkgptError> {
        if let Some(session) = self.sessions.get(user_id) {
            return Ok(session.value().clone());
        }

        let session = Arc::new(ChatSession::new(user_id, self.deps.clone()));
        session.spawn_reconciler();
        session.load().await?;

        let session = match self.sessions.entry(user_id.to_string()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => slot.insert(session).clone(),
        };
        Ok(session)
    }

    /// Forgets a user's session.
    pub fn remove(&self, user_id: &str) -> bool {
        self.sessions.remove(user_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
