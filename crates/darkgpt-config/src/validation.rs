// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Every rule runs; all failures are reported together.

use crate::diagnostic::ConfigError;
use crate::model::DarkgptConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const SEARCH_DEPTHS: &[&str] = &["basic", "advanced"];
const MAX_SEARCH_RESULTS: usize = 5;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &DarkgptConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.anthropic.max_tokens == 0 {
        fail("anthropic.max_tokens must be greater than 0".to_string());
    }

    if !is_http_url(&config.anthropic.base_url) {
        fail(format!(
            "anthropic.base_url `{}` must be an http(s) URL",
            config.anthropic.base_url
        ));
    }

    if !is_http_url(&config.search.base_url) {
        fail(format!(
            "search.base_url `{}` must be an http(s) URL",
            config.search.base_url
        ));
    }

    if config.search.max_results == 0 || config.search.max_results > MAX_SEARCH_RESULTS {
        fail(format!(
            "search.max_results must be between 1 and {MAX_SEARCH_RESULTS}, got {}",
            config.search.max_results
        ));
    }

    if !SEARCH_DEPTHS.contains(&config.search.search_depth.as_str()) {
        fail(format!(
            "search.search_depth `{}` must be one of: {}",
            config.search.search_depth,
            SEARCH_DEPTHS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.chat.history_limit == 0 {
        fail("chat.history_limit must be at least 1".to_string());
    }

    if config.chat.max_image_bytes == 0 {
        fail("chat.max_image_bytes must be greater than 0".to_string());
    }

    if config.chat.max_tool_iterations == 0 {
        fail("chat.max_tool_iterations must be at least 1".to_string());
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if config.auth.min_name_len == 0 {
        fail("auth.min_name_len must be at least 1".to_string());
    }

    if config.auth.min_password_len == 0 {
        fail("auth.min_password_len must be at least 1".to_string());
    }

    if !(0.0..=1.0).contains(&config.ui.theme_intensity) {
        fail(format!(
            "ui.theme_intensity must be between 0.0 and 1.0, got {}",
            config.ui.theme_intensity
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&DarkgptConfig::default()).is_ok());
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = DarkgptConfig::default();
        config.chat.history_limit = 0;
        config.search.max_results = 9;
        config.ui.theme_intensity = 1.5;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = DarkgptConfig::default();
        config.agent.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("agent.log_level"));
    }

    #[test]
    fn rejects_hostname_with_spaces() {
        let mut config = DarkgptConfig::default();
        config.gateway.host = "local host".into();
        assert!(validate_config(&config).is_err());

        config.gateway.host = "::1".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_non_http_search_url() {
        let mut config = DarkgptConfig::default();
        config.search.base_url = "ftp://example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("search.base_url"));
    }
}
