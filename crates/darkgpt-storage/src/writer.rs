// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget message writer with change notification.
//!
//! [`MessageWriter::append`] queues a message and returns at once. A single
//! background task drains the queue in order, writes each message through
//! the [`StorageAdapter`], and publishes the outcome as a [`StoreEvent`].
//! Writes are attempted once; a failed write is reported, not retried.

use std::sync::Arc;

use darkgpt_core::types::Message;
use darkgpt_core::{DarkgptError, StorageAdapter};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Buffered notifications per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 256;

/// Outcome of one queued append.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The message is durable. Carries the stored copy with its final timestamp.
    Confirmed(Message),
    /// The write failed and will not be retried.
    Failed {
        message_id: String,
        user_id: String,
        error: String,
    },
}

impl StoreEvent {
    /// Owner of the message this event is about.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            StoreEvent::Confirmed(message) => message.user_id.as_deref(),
            StoreEvent::Failed { user_id, .. } => Some(user_id),
        }
    }
}

enum WriteJob {
    Append(Message),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer. Cheap to clone.
#[derive(Clone)]
pub struct MessageWriter {
    jobs: mpsc::UnboundedSender<WriteJob>,
    events: broadcast::Sender<StoreEvent>,
}

impl MessageWriter {
    /// Spawns the writer task. It exits once every handle has been dropped
    /// and the queue is drained.
    pub fn spawn(storage: Arc<dyn StorageAdapter>) -> (Self, JoinHandle<()>) {
        let (jobs, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let handle = tokio::spawn(run(storage, rx, events.clone()));
        (Self { jobs, events }, handle)
    }

    /// Queues a message for persistence without waiting for the write.
    ///
    /// Fails only when the writer task is gone.
    pub fn append(&self, message: Message) -> Result<(), DarkgptError> {
        self.jobs.send(WriteJob::Append(message)).map_err(|_| {
            DarkgptError::PersistenceUnavailable("message writer has stopped".into())
        })
    }

    /// Subscribes to write outcomes published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Waits until every append queued before this call has been attempted.
    pub async fn flush(&self) -> Result<(), DarkgptError> {
        let (tx, rx) = oneshot::channel();
        self.jobs.send(WriteJob::Flush(tx)).map_err(|_| {
            DarkgptError::PersistenceUnavailable("message writer has stopped".into())
        })?;
        rx.await.map_err(|_| {
            DarkgptError::PersistenceUnavailable("message writer stopped before flushing".into())
        })
    }
}

async fn run(
    storage: Arc<dyn StorageAdapter>,
    mut jobs: mpsc::UnboundedReceiver<WriteJob>,
    events: broadcast::Sender<StoreEvent>,
) {
    while let Some(job) = jobs.recv().await {
        match job {
            WriteJob::Append(message) => {
                let event = match storage.append_message(&message).await {
                    Ok(stored) => {
                        debug!(message_id = %stored.id, role = %stored.role, "message persisted");
                        StoreEvent::Confirmed(stored)
                    }
                    Err(e) => {
                        warn!(message_id = %message.id, error = %e, "message write failed");
                        StoreEvent::Failed {
                            message_id: message.id.clone(),
                            user_id: message.user_id.clone().unwrap_or_default(),
                            error: e.to_string(),
                        }
                    }
                };
                // No subscribers is fine.
                let _ = events.send(event);
            }
            WriteJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("message writer stopped");
}
