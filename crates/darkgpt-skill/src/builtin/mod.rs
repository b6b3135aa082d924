// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tools.

pub mod web_search;

pub use web_search::WebSearchTool;

use std::sync::Arc;

use darkgpt_config::model::SearchConfig;

use crate::ToolRegistry;

/// Registers every built-in tool into the given registry.
///
/// The web search tool is registered even without a credential; it then
/// reports itself as unconfigured and fails when invoked.
pub fn register_builtins(registry: &mut ToolRegistry, search: &SearchConfig) {
    registry.register(Arc::new(WebSearchTool::from_config(search)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_web_search() {
        let mut registry = ToolRegistry::new();
        register_builtins(&mut registry, &SearchConfig::default());
        assert_eq!(registry.len(), 1);
        assert!(registry.get(web_search::TOOL_NAME).is_some());
    }
}
