// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use darkgpt_core::Message;

/// Renders a conversation as `role: content` lines, marking turns that
/// carried an image with `[IMAGE] `.
pub fn format_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| {
            let marker = if m.image.is_some() { "[IMAGE] " } else { "" };
            format!("{}: {marker}{}", m.role, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
