// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/darkgpt/darkgpt.toml`, then
//! `~/.config/darkgpt/darkgpt.toml`, then `./darkgpt.toml`, then `DARKGPT_*`
//! environment variables. Later layers win.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DarkgptConfig;

/// Sections that may be addressed from the environment.
const ENV_SECTIONS: &[&str] = &[
    "agent",
    "anthropic",
    "search",
    "storage",
    "chat",
    "gateway",
    "auth",
    "ui",
];

/// Config files consulted by [`load_config`], lowest precedence first.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/darkgpt/darkgpt.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("darkgpt/darkgpt.toml"));
    }
    paths.push(PathBuf::from("darkgpt.toml"));
    paths
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(DarkgptConfig::default()));
    for path in config_file_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<DarkgptConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<DarkgptConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DarkgptConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DarkgptConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DarkgptConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `DARKGPT_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Only the first underscore after the section name is a separator, so
/// `DARKGPT_SEARCH_API_KEY` becomes `search.api_key`.
fn env_provider() -> Env {
    Env::prefixed("DARKGPT_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        for section in ENV_SECTIONS {
            if let Some(rest) = key
                .strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DARKGPT_SEARCH_API_KEY", "tvly-test");
            jail.set_env("DARKGPT_CHAT_HISTORY_LIMIT", "20");
            jail.set_env("DARKGPT_GATEWAY_PORT", "9090");

            let config: DarkgptConfig = Figment::new()
                .merge(Serialized::defaults(DarkgptConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.search.api_key.as_deref(), Some("tvly-test"));
            assert_eq!(config.chat.history_limit, 20);
            assert_eq!(config.gateway.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn file_layer_is_read_from_path() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [agent]
                name = "from-file"
                "#,
            )?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.agent.name, "from-file");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_last_file_layer() {
        let paths = config_file_paths();
        assert_eq!(paths.last().map(PathBuf::as_path), Some(Path::new("darkgpt.toml")));
        assert_eq!(paths[0], PathBuf::from("/etc/darkgpt/darkgpt.toml"));
    }
}
