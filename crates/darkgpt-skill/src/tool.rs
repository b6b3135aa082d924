// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use darkgpt_core::DarkgptError;
use serde::{Deserialize, Serialize};

/// Output from a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Text handed back to the model (for web search, a JSON array).
    pub content: String,
    /// Whether the model should treat `content` as an error report.
    pub is_error: bool,
}

/// A capability the AI backend may call during a completion.
///
/// `invoke` receives the parsed JSON input of the backend's `tool_use` block.
/// An `Err` aborts the whole turn; it is not fed back to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used for lookup and in the API tool definition.
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema of the tool input.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Whether the tool has what it needs (credentials) to run.
    fn is_configured(&self) -> bool {
        true
    }

    /// Runs the tool.
    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, DarkgptError>;
}

/// Registry of available tools, indexed by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its `name()`, replacing any previous one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Returns (name, description) pairs sorted by name.
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .tools
            .values()
            .map(|t| (t.name(), t.description()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    /// Anthropic-format tool definitions, sorted by name:
    /// `{"name", "description", "input_schema"}`.
    pub fn tool_definitions(&self) -> Vec<serde_json::Value> {
        let mut tools: Vec<&Arc<dyn Tool>> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "input_schema": t.parameters_schema(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes the input back"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "message": { "type": "string" } },
                "required": ["message"]
            })
        }

        async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, DarkgptError> {
            Ok(ToolOutput {
                content: input["message"].as_str().unwrap_or_default().to_string(),
                is_error: false,
            })
        }
    }

    struct UnconfiguredTool;

    #[async_trait]
    impl Tool for UnconfiguredTool {
        fn name(&self) -> &str {
            "archive"
        }

        fn description(&self) -> &str {
            "Needs a key"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object"})
        }

        fn is_configured(&self) -> bool {
            false
        }

        async fn invoke(&self, _input: serde_json::Value) -> Result<ToolOutput, DarkgptError> {
            Err(DarkgptError::Config("archive key missing".into()))
        }
    }

    #[test]
    fn empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("echo").is_none());
        assert!(registry.tool_definitions().is_empty());
    }

    #[tokio::test]
    async fn registered_tool_is_invocable() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let tool = registry.get("echo").unwrap();
        let output = tool
            .invoke(serde_json::json!({"message": "hello"}))
            .await
            .unwrap();
        assert_eq!(output.content, "hello");
        assert!(!output.is_error);
    }

    #[test]
    fn definitions_are_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(UnconfiguredTool));

        let defs = registry.tool_definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0]["name"], "archive");
        assert_eq!(defs[1]["name"], "echo");
        assert!(defs[1]["input_schema"]["properties"]["message"].is_object());

        let names: Vec<&str> = registry.list().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["archive", "echo"]);
    }

    #[test]
    fn configured_defaults_to_true() {
        assert!(EchoTool.is_configured());
        assert!(!UnconfiguredTool.is_configured());
    }

    #[test]
    fn registering_same_name_replaces() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
    }
}
