// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestrator.
//!
//! Turns a rendered chat history (plus an optional image and the expert-mode
//! flag) into a single reply. Drives the backend's tool-use protocol: tool
//! calls requested by the model are executed through the [`ToolRegistry`] and
//! fed back until the model answers in text.

use std::sync::Arc;

use darkgpt_config::DarkgptConfig;
use darkgpt_core::types::{
    ChatReply, ChatRequest, ContentBlock, ProviderMessage, ProviderRequest, ToolChoice,
    ToolUseData,
};
use darkgpt_core::{DarkgptError, ProviderAdapter};
use darkgpt_skill::builtin::web_search::{MISSING_KEY, TOOL_NAME};
use darkgpt_skill::{ToolOutput, ToolRegistry};
use tracing::{debug, info, warn};

use crate::attachment::{parse_data_uri, ImageAttachment};
use crate::prompt::{system_prompt, user_prompt};

/// Tunables for [`Orchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub persona: String,
    pub model: String,
    pub max_tokens: u32,
    pub max_image_bytes: usize,
    pub max_tool_iterations: usize,
}

impl OrchestratorSettings {
    /// Settings from loaded configuration and a resolved persona.
    pub fn from_config(config: &DarkgptConfig, persona: String) -> Self {
        Self {
            persona,
            model: config.anthropic.default_model.clone(),
            max_tokens: config.anthropic.max_tokens,
            max_image_bytes: config.chat.max_image_bytes,
            max_tool_iterations: config.chat.max_tool_iterations,
        }
    }
}

/// Produces one assistant reply per call. Stateless between calls.
pub struct Orchestrator {
    provider: Arc<dyn ProviderAdapter>,
    tools: ToolRegistry,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        tools: ToolRegistry,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            provider,
            tools,
            settings,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Generates the assistant's reply to the latest turn in `request`.
    ///
    /// Input problems fail with [`DarkgptError::Validation`] and a missing
    /// search credential in expert mode with [`DarkgptError::Config`], both
    /// before any network call. Every other failure is reported as
    /// [`DarkgptError::Provider`] with an `AI backend error:` prefix.
    pub async fn generate(&self, request: &ChatRequest) -> Result<ChatReply, DarkgptError> {
        let image = request
            .image
            .as_deref()
            .map(|uri| parse_data_uri(uri, self.settings.max_image_bytes))
            .transpose()?;

        if request.chat_history.trim().is_empty() && image.is_none() {
            return Err(DarkgptError::Validation(
                "chat history is empty and no image was provided".into(),
            ));
        }

        if request.use_web_search {
            self.ensure_search_available()?;
        }

        info!(
            expert_mode = request.use_web_search,
            has_image = image.is_some(),
            history_len = request.chat_history.len(),
            "generating reply"
        );

        match self.run(request, image).await {
            Ok(response) => Ok(ChatReply { response }),
            Err(e @ (DarkgptError::Config(_) | DarkgptError::Validation(_))) => Err(e),
            Err(e) => {
                warn!(error = %e, "AI backend call failed");
                Err(DarkgptError::Provider {
                    message: format!("AI backend error: {e}"),
                    source: Some(Box::new(e)),
                })
            }
        }
    }

    fn ensure_search_available(&self) -> Result<(), DarkgptError> {
        match self.tools.get(TOOL_NAME) {
            Some(tool) if tool.is_configured() => Ok(()),
            Some(_) => Err(DarkgptError::Config(MISSING_KEY.to_string())),
            None => Err(DarkgptError::Config(format!(
                "expert mode requires the {TOOL_NAME} tool, which is not configured"
            ))),
        }
    }

    async fn run(
        &self,
        request: &ChatRequest,
        image: Option<ImageAttachment>,
    ) -> Result<String, DarkgptError> {
        let mut content = vec![ContentBlock::Text {
            text: user_prompt(&request.chat_history),
        }];
        if let Some(image) = image {
            content.push(ContentBlock::Image {
                media_type: image.media_type,
                data: image.data,
            });
        }
        let mut messages = vec![ProviderMessage {
            role: "user".to_string(),
            content,
        }];

        let system = system_prompt(&self.settings.persona, request.use_web_search);
        let tools = if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.tool_definitions())
        };
        let mut tool_choice = if request.use_web_search {
            ToolChoice::Tool {
                name: TOOL_NAME.to_string(),
            }
        } else {
            ToolChoice::Auto
        };

        let mut full_response = String::new();

        for iteration in 0..=self.settings.max_tool_iterations {
            let response = self
                .provider
                .complete(ProviderRequest {
                    model: self.settings.model.clone(),
                    system_prompt: Some(system.clone()),
                    messages: messages.clone(),
                    max_tokens: self.settings.max_tokens,
                    tools: tools.clone(),
                    tool_choice: tools.as_ref().map(|_| tool_choice.clone()),
                })
                .await?;

            debug!(
                iteration,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                tool_calls = response.tool_uses.len(),
                "backend responded"
            );

            let text = response.content.trim();
            if !text.is_empty() {
                if !full_response.is_empty() {
                    full_response.push_str("\n\n");
                }
                full_response.push_str(text);
            }

            if response.tool_uses.is_empty() {
                if full_response.is_empty() {
                    return Err(DarkgptError::provider(
                        "the AI backend did not produce a valid response",
                    ));
                }
                return Ok(full_response);
            }

            if iteration >= self.settings.max_tool_iterations {
                return Err(DarkgptError::provider(format!(
                    "tool use did not finish within {} iterations",
                    self.settings.max_tool_iterations
                )));
            }

            let mut assistant_blocks = Vec::with_capacity(response.tool_uses.len() + 1);
            if !text.is_empty() {
                assistant_blocks.push(ContentBlock::Text {
                    text: text.to_string(),
                });
            }
            assistant_blocks.extend(response.tool_uses.iter().map(|tu| ContentBlock::ToolUse {
                id: tu.id.clone(),
                name: tu.name.clone(),
                input: tu.input.clone(),
            }));
            messages.push(ProviderMessage {
                role: "assistant".to_string(),
                content: assistant_blocks,
            });

            let mut results = Vec::with_capacity(response.tool_uses.len());
            for tool_use in &response.tool_uses {
                let output = self.invoke_tool(tool_use).await?;
                results.push(ContentBlock::ToolResult {
                    tool_use_id: tool_use.id.clone(),
                    content: output.content,
                    is_error: output.is_error,
                });
            }
            messages.push(ProviderMessage {
                role: "user".to_string(),
                content: results,
            });

            tool_choice = ToolChoice::Auto;
        }

        // The final iteration always returns.
        Err(DarkgptError::Internal("tool loop exited unexpectedly".into()))
    }

    /// Runs one requested tool. An unknown tool name is reported back to the
    /// model; a failing tool aborts the turn.
    async fn invoke_tool(&self, tool_use: &ToolUseData) -> Result<ToolOutput, DarkgptError> {
        let Some(tool) = self.tools.get(&tool_use.name) else {
            warn!(tool = %tool_use.name, "model requested an unknown tool");
            return Ok(ToolOutput {
                content: format!("Unknown tool: {}", tool_use.name),
                is_error: true,
            });
        };

        debug!(tool = %tool_use.name, tool_use_id = %tool_use.id, "invoking tool");
        let output = tool.invoke(tool_use.input.clone()).await?;
        debug!(
            tool = %tool_use.name,
            is_error = output.is_error,
            bytes = output.content.len(),
            "tool finished"
        );
        Ok(output)
    }
}
