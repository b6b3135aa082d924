// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for DarkGPT.

use thiserror::Error;

/// The primary error type used across all DarkGPT adapters and operations.
#[derive(Debug, Error)]
pub enum DarkgptError {
    /// Configuration errors, including a missing credential for an external tool.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The message store or a session is not ready to accept work.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// AI backend errors (API failure, empty output, wrapped tool failures).
    #[error("{message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external tool was reached but its call failed.
    #[error("{message}")]
    ToolExecution {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// User input failed validation (form fields, attachments).
    #[error("validation error: {0}")]
    Validation(String),

    /// Identity errors (bad credentials, duplicate email, unknown token).
    #[error("authentication error: {0}")]
    Auth(String),

    /// A turn is already in flight for this session.
    #[error("a message is already being processed for this session")]
    SessionBusy,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DarkgptError {
    /// Builds a [`DarkgptError::Provider`] without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`DarkgptError::ToolExecution`] without an underlying source.
    pub fn tool(message: impl Into<String>) -> Self {
        Self::ToolExecution {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any storage-layer error.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_displayed_verbatim() {
        let err = DarkgptError::provider("AI backend error: boom");
        assert_eq!(err.to_string(), "AI backend error: boom");
    }

    #[test]
    fn config_error_is_prefixed() {
        let err = DarkgptError::Config("web search API key is not configured".into());
        assert!(err.to_string().starts_with("configuration error:"));
        assert!(err.to_string().contains("not configured"));
    }
}
