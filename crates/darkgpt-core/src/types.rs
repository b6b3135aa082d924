// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the DarkGPT crates.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::DarkgptError;

/// Format of every timestamp stored or exchanged by DarkGPT.
///
/// Fixed-width UTC with millisecond precision, so lexicographic order matches
/// chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Returns the current UTC time formatted with [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Auth,
}

// --- Conversation types ---

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single turn in a user's conversation.
///
/// Immutable once persisted. `created_at` is reassigned by the store on write
/// so that it never decreases within one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: String,
    /// Attached image as a `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Message {
    /// Creates a message owned by `user_id` with a fresh id and the current time.
    pub fn new(
        user_id: &str,
        role: Role,
        content: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: timestamp_now(),
            image,
            user_id: Some(user_id.to_string()),
        }
    }

    /// Checks the content/image invariant: content may be empty only when an
    /// image is attached.
    pub fn validate(&self) -> Result<(), DarkgptError> {
        if self.content.trim().is_empty() && self.image.is_none() {
            return Err(DarkgptError::Validation(
                "message content may only be empty when an image is attached".into(),
            ));
        }
        Ok(())
    }
}

/// Public profile of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// A user profile together with its password hash, as held by the store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub profile: UserProfile,
    /// PHC-formatted argon2 hash.
    pub password_hash: String,
}

/// Input to one orchestration call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The full conversation rendered as text, one turn per line.
    pub chat_history: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Expert mode: the backend must consult web search before answering.
    #[serde(default)]
    pub use_web_search: bool,
}

/// Output of one successful orchestration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

// --- Provider types ---

/// A request to the AI completion backend.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: u32,
    /// Tool definitions in the backend's JSON schema format.
    pub tools: Option<Vec<serde_json::Value>>,
    pub tool_choice: Option<ToolChoice>,
}

/// One message in a provider conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderMessage {
    /// "user" or "assistant".
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// A content block inside a [`ProviderMessage`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Base64 image data without the `data:` prefix.
    Image {
        media_type: String,
        data: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

/// How the backend may use the offered tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// The backend decides whether to call a tool.
    Auto,
    /// The backend must call at least one tool.
    Any,
    /// The backend must call the named tool.
    Tool { name: String },
}

/// A tool call requested by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUseData {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// A complete response from the AI completion backend.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    /// Concatenated text blocks.
    pub content: String,
    pub tool_uses: Vec<ToolUseData>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

/// Token usage reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
