// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock tool with a canned result.

use async_trait::async_trait;
use tokio::sync::Mutex;

use darkgpt_core::DarkgptError;
use darkgpt_skill::{Tool, ToolOutput};

/// A tool that returns a fixed output and records its inputs.
pub struct MockTool {
    name: String,
    output: String,
    configured: bool,
    failure: Option<String>,
    calls: Mutex<Vec<serde_json::Value>>,
}

impl MockTool {
    /// A configured tool that always returns `output`.
    pub fn new(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            configured: true,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A tool that reports itself unconfigured, like a search tool without
    /// a credential.
    pub fn unconfigured(name: impl Into<String>) -> Self {
        Self {
            configured: false,
            ..Self::new(name, "")
        }
    }

    /// A configured tool whose every call fails with a tool execution error.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(name, "")
        }
    }

    /// Inputs received so far.
    pub async fn calls(&self) -> Vec<serde_json::Value> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Mock tool for tests"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        })
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, DarkgptError> {
        self.calls.lock().await.push(input);
        if let Some(message) = &self.failure {
            return Err(DarkgptError::tool(message.clone()));
        }
        Ok(ToolOutput {
            content: self.output.clone(),
            is_error: false,
        })
    }
}
