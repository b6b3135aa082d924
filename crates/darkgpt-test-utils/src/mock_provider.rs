// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock AI backend for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies popped
//! from a FIFO queue. When the queue is empty, a default "mock response"
//! text is returned. Every request is recorded for assertions.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use darkgpt_core::traits::{PluginAdapter, ProviderAdapter};
use darkgpt_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage, ToolUseData,
};
use darkgpt_core::DarkgptError;

/// One scripted backend reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A plain text answer.
    Text(String),
    /// A request to call a tool.
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    /// A backend failure with the given message.
    Error(String),
}

/// A mock AI backend that returns pre-configured replies.
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Text).collect())
    }

    /// Create a mock provider pre-loaded with scripted replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string()))
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, DarkgptError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DarkgptError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, DarkgptError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        let (content, tool_uses, stop_reason) = match self.next_reply().await {
            MockReply::Text(text) => (text, Vec::new(), "end_turn"),
            MockReply::ToolUse { name, input } => (
                String::new(),
                vec![ToolUseData {
                    id: format!("toolu_{}", uuid::Uuid::new_v4().simple()),
                    name,
                    input,
                }],
                "tool_use",
            ),
            MockReply::Error(message) => return Err(DarkgptError::provider(message)),
        };

        Ok(ProviderResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content,
            tool_uses,
            model,
            stop_reason: Some(stop_reason.to_string()),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: None,
            messages: vec![],
            max_tokens: 100,
            tools: None,
            tool_choice: None,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "mock response");
        assert!(resp.tool_uses.is_empty());
    }

    #[tokio::test]
    async fn scripted_replies_in_order() {
        let provider = MockProvider::with_replies(vec![
            MockReply::ToolUse {
                name: "web_search".into(),
                input: serde_json::json!({"query": "rust"}),
            },
            MockReply::Text("done".into()),
            MockReply::Error("boom".into()),
        ]);

        let first = provider.complete(request()).await.unwrap();
        assert_eq!(first.tool_uses[0].name, "web_search");
        assert_eq!(first.stop_reason.as_deref(), Some("tool_use"));

        let second = provider.complete(request()).await.unwrap();
        assert_eq!(second.content, "done");

        let err = provider.complete(request()).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(provider.call_count().await, 3);
    }
}
