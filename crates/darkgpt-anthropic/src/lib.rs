// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic provider adapter for DarkGPT.
//!
//! Implements [`ProviderAdapter`] over the Messages API. Tool definitions and
//! `tool_choice` are passed through; executing requested tools is left to the
//! caller.

pub mod client;
pub mod types;

use async_trait::async_trait;
use darkgpt_config::model::AnthropicConfig;
use darkgpt_core::error::DarkgptError;
use darkgpt_core::traits::{PluginAdapter, ProviderAdapter};
use darkgpt_core::types::{
    AdapterType, ContentBlock, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
    ToolChoice, ToolUseData,
};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{
    ApiContent, ApiContentBlock, ApiMessage, ApiToolChoice, ImageSource, MessageRequest,
    MessageResponse, ResponseContentBlock, ToolDefinition,
};

/// Anthropic provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config, then `ANTHROPIC_API_KEY`, then error.
pub struct AnthropicProvider {
    client: AnthropicClient,
    model: String,
}

impl AnthropicProvider {
    /// Creates a provider from the `[anthropic]` config section.
    pub fn new(config: &AnthropicConfig) -> Result<Self, DarkgptError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = AnthropicClient::new(&api_key, &config.api_version, &config.base_url)?;

        info!(model = %config.default_model, "Anthropic provider initialized");

        Ok(Self {
            client,
            model: config.default_model.clone(),
        })
    }

    /// Model used when a request leaves `model` empty.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_message_request(&self, request: &ProviderRequest) -> MessageRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.clone(),
                content: convert_content_blocks(&m.content),
            })
            .collect();

        let tools = request
            .tools
            .as_ref()
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| serde_json::from_value::<ToolDefinition>(v.clone()).ok())
                    .collect::<Vec<_>>()
            })
            .filter(|tools| !tools.is_empty());

        // tool_choice without tools is rejected by the API.
        let tool_choice = match tools {
            Some(_) => request.tool_choice.as_ref().map(convert_tool_choice),
            None => None,
        };

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        MessageRequest {
            model,
            messages,
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens,
            tools,
            tool_choice,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
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
impl ProviderAdapter for AnthropicProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, DarkgptError> {
        let api_request = self.to_message_request(&request);
        debug!(
            messages = api_request.messages.len(),
            tools = api_request.tools.as_ref().map_or(0, Vec::len),
            "sending completion request"
        );
        let response = self.client.complete_message(&api_request).await?;
        Ok(into_provider_response(response))
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: Option<&str>) -> Result<String, DarkgptError> {
    match config_key {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DarkgptError::Config(
                    "Anthropic API key not found. Set anthropic.api_key in config or the ANTHROPIC_API_KEY environment variable.".into(),
                )
            }),
    }
}

fn convert_tool_choice(choice: &ToolChoice) -> ApiToolChoice {
    match choice {
        ToolChoice::Auto => ApiToolChoice::Auto,
        ToolChoice::Any => ApiToolChoice::Any,
        ToolChoice::Tool { name } => ApiToolChoice::Tool { name: name.clone() },
    }
}

/// Converts core [`ContentBlock`]s to API content. A lone text block is sent
/// as a plain string.
fn convert_content_blocks(blocks: &[ContentBlock]) -> ApiContent {
    if let [ContentBlock::Text { text }] = blocks {
        return ApiContent::Text(text.clone());
    }

    let api_blocks = blocks
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text } => ApiContentBlock::Text { text: text.clone() },
            ContentBlock::Image { media_type, data } => ApiContentBlock::Image {
                source: ImageSource {
                    source_type: "base64".to_string(),
                    media_type: media_type.clone(),
                    data: data.clone(),
                },
            },
            ContentBlock::ToolUse { id, name, input } => ApiContentBlock::ToolUse {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            },
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => ApiContentBlock::ToolResult {
                tool_use_id: tool_use_id.clone(),
                content: content.clone(),
                is_error: *is_error,
            },
        })
        .collect();

    ApiContent::Blocks(api_blocks)
}

/// Joins text blocks and collects tool calls from an API response.
fn into_provider_response(response: MessageResponse) -> ProviderResponse {
    let mut texts = Vec::new();
    let mut tool_uses = Vec::new();
    for block in response.content {
        match block {
            ResponseContentBlock::Text { text } => texts.push(text),
            ResponseContentBlock::ToolUse { id, name, input } => {
                tool_uses.push(ToolUseData { id, name, input })
            }
            ResponseContentBlock::Other => {}
        }
    }

    ProviderResponse {
        id: response.id,
        content: texts.join("\n"),
        tool_uses,
        model: response.model,
        stop_reason: response.stop_reason,
        usage: TokenUsage {
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        },
    }
}
