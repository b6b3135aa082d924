// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona resolution and prompt assembly.

use darkgpt_config::model::AgentConfig;
use darkgpt_skill::builtin::web_search::TOOL_NAME;
use tracing::{info, warn};

const IMAGE_INSTRUCTION: &str =
    "If an image is provided, analyse it and use it as the primary context for your answer.";

const TOOL_FAILURE_INSTRUCTION: &str = "If a tool fails (for example the web search), do not \
    apologise at length. Tell the user plainly what went wrong (for example \"the web search \
    failed, the API key is missing\") and continue if you can, or ask them to check the \
    configuration.";

/// Resolves the persona instruction.
///
/// Priority: `system_prompt_file`, then `system_prompt`, then the built-in
/// persona. An unreadable or empty file falls through to the next source.
pub async fn load_persona(agent: &AgentConfig) -> String {
    if let Some(path) = &agent.system_prompt_file {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = %path, "loaded persona from file");
                    return trimmed.to_string();
                }
                warn!(path = %path, "persona file is empty, falling back");
            }
            Err(e) => {
                warn!(path = %path, error = %e, "failed to read persona file, falling back");
            }
        }
    }

    if let Some(inline) = &agent.system_prompt {
        let trimmed = inline.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    default_persona(&agent.name)
}

/// Built-in persona for an assistant called `name`.
pub fn default_persona(name: &str) -> String {
    format!(
        "You are {name}. Your personality is direct and unconventional. You answer plainly, \
         without lecturing or moralising, and you stay focused on what was asked."
    )
}

/// Full system prompt for one turn.
pub fn system_prompt(persona: &str, expert_mode: bool) -> String {
    let search = if expert_mode {
        format!(
            "EXPERT MODE ENABLED: you MUST use the {TOOL_NAME} tool to find current, relevant \
             information before answering. Do NOT answer without searching first. Analyse the \
             search results to give the best possible answer."
        )
    } else {
        format!(
            "If you need up-to-date information or a web search to answer, you may use the \
             {TOOL_NAME} tool."
        )
    };

    format!("{persona}\n{IMAGE_INSTRUCTION}\n\n{search}\n\n{TOOL_FAILURE_INSTRUCTION}")
}

/// User-side prompt embedding the rendered conversation.
pub fn user_prompt(chat_history: &str) -> String {
    format!(
        "Answer the user's latest request based on the chat history and the provided image, \
         if any.\n\nChat history:\n{chat_history}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expert_mode_requires_search() {
        let prompt = system_prompt("You are X.", true);
        assert!(prompt.starts_with("You are X."));
        assert!(prompt.contains("MUST use the web_search tool"));
        assert!(prompt.contains("If a tool fails"));
    }

    #[test]
    fn normal_mode_makes_search_optional() {
        let prompt = system_prompt("You are X.", false);
        assert!(prompt.contains("you may use the web_search tool"));
        assert!(!prompt.contains("MUST"));
    }

    #[test]
    fn user_prompt_embeds_history() {
        let prompt = user_prompt("user: Bonjour\nassistant: Salut");
        assert!(prompt.ends_with("Chat history:\nuser: Bonjour\nassistant: Salut"));
    }

    #[tokio::test]
    async fn persona_defaults_to_agent_name() {
        let persona = load_persona(&AgentConfig::default()).await;
        assert!(persona.starts_with("You are DarkGPT."));
    }

    #[tokio::test]
    async fn inline_persona_beats_default() {
        let agent = AgentConfig {
            system_prompt: Some("  Be brief.  ".into()),
            ..Default::default()
        };
        assert_eq!(load_persona(&agent).await, "Be brief.");
    }

    #[tokio::test]
    async fn file_persona_beats_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.md");
        std::fs::write(&path, "From file.\n").unwrap();

        let agent = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert_eq!(load_persona(&agent).await, "From file.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let agent = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some("/nonexistent/darkgpt/persona.md".into()),
            ..Default::default()
        };
        assert_eq!(load_persona(&agent).await, "Inline.");
    }
}
