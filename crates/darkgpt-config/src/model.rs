// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is a
//! startup error rather than a silently ignored setting.

use serde::{Deserialize, Serialize};

/// Top-level DarkGPT configuration. Every section defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DarkgptConfig {
    /// Persona and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// AI completion backend.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Web search tool backend.
    #[serde(default)]
    pub search: SearchConfig,

    /// Message store.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-turn chat limits.
    #[serde(default)]
    pub chat: ChatConfig,

    /// HTTP API.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Signup and login rules.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Presentation settings. Not read by the core.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline persona prompt. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the persona prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_agent_name() -> String {
    "DarkGPT".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key. Falls back to `ANTHROPIC_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for every completion.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Messages endpoint.
    #[serde(default = "default_anthropic_url")]
    pub base_url: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            base_url: default_anthropic_url(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

/// Web search (Tavily) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// API key. Falls back to `TAVILY_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search endpoint.
    #[serde(default = "default_search_url")]
    pub base_url: String,

    /// Number of results returned to the model (1 to 5).
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Tavily search depth ("basic" or "advanced").
    #[serde(default = "default_search_depth")]
    pub search_depth: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_search_url(),
            max_results: default_max_results(),
            search_depth: default_search_depth(),
        }
    }
}

fn default_search_url() -> String {
    "https://api.tavily.com/search".to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_search_depth() -> String {
    "basic".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("darkgpt").join("darkgpt.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("darkgpt.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Chat turn configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Number of most recent messages loaded into a session.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Largest accepted image attachment, in decoded bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Upper bound on tool-use rounds within one turn.
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: usize,

    /// Assistant greeting shown for an empty conversation.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            max_image_bytes: default_max_image_bytes(),
            max_tool_iterations: default_max_tool_iterations(),
            greeting: default_greeting(),
        }
    }
}

fn default_history_limit() -> usize {
    50
}

fn default_max_image_bytes() -> usize {
    4 * 1024 * 1024
}

fn default_max_tool_iterations() -> usize {
    5
}

fn default_greeting() -> String {
    "I am DarkGPT. How can I help you today?".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Signup rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Minimum display name length, in characters.
    #[serde(default = "default_min_name_len")]
    pub min_name_len: usize,

    /// Minimum password length, in characters.
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_name_len: default_min_name_len(),
            min_password_len: default_min_password_len(),
        }
    }
}

fn default_min_name_len() -> usize {
    2
}

fn default_min_password_len() -> usize {
    6
}

/// Presentation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Colour intensity of the client theme, 0.0 to 1.0.
    #[serde(default = "default_theme_intensity")]
    pub theme_intensity: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_intensity: default_theme_intensity(),
        }
    }
}

fn default_theme_intensity() -> f64 {
    0.9
}
