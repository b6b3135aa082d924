// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the DarkGPT configuration system.

use darkgpt_config::diagnostic::ConfigError;
use darkgpt_config::{load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[agent]
name = "dark"
log_level = "debug"
system_prompt = "Be brief."

[anthropic]
api_key = "sk-ant-123"
max_tokens = 1024

[search]
api_key = "tvly-abc"
max_results = 3
search_depth = "advanced"

[storage]
database_path = "/tmp/darkgpt-test.db"
wal_mode = false

[chat]
history_limit = 20
max_image_bytes = 1048576
greeting = "Hello."

[gateway]
host = "0.0.0.0"
port = 8081

[auth]
min_password_len = 8

[ui]
theme_intensity = 0.5
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "dark");
    assert_eq!(config.agent.system_prompt.as_deref(), Some("Be brief."));
    assert_eq!(config.anthropic.max_tokens, 1024);
    assert_eq!(config.search.api_key.as_deref(), Some("tvly-abc"));
    assert_eq!(config.search.max_results, 3);
    assert!(!config.storage.wal_mode);
    assert_eq!(config.chat.history_limit, 20);
    assert_eq!(config.chat.greeting, "Hello.");
    assert_eq!(config.gateway.port, 8081);
    assert_eq!(config.auth.min_password_len, 8);
    assert_eq!(config.auth.min_name_len, 2);
    assert_eq!(config.ui.theme_intensity, 0.5);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.agent.name, "DarkGPT");
    assert_eq!(config.chat.history_limit, 50);
    assert_eq!(config.chat.max_image_bytes, 4 * 1024 * 1024);
    assert_eq!(config.search.base_url, "https://api.tavily.com/search");
    assert!(config.search.api_key.is_none());
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[chat]
history_limt = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "history_limt");
            assert_eq!(suggestion.as_deref(), Some("history_limit"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telegram]\nbot_token = \"x\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[gateway]\nport = \"eighty\"\n").unwrap_err();
    assert!(
        matches!(errors[0], ConfigError::InvalidType { .. }),
        "got {:?}",
        errors[0]
    );
}

#[test]
fn semantic_validation_runs_after_parse() {
    let errors = load_and_validate_str("[ui]\ntheme_intensity = 2.0\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
    assert!(errors[0].to_string().contains("ui.theme_intensity"));
}
