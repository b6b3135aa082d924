// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait, registry, and built-in tools for DarkGPT.
//!
//! The [`ToolRegistry`] resolves tool calls requested by the AI backend and
//! produces the tool definitions sent with each completion request. The only
//! built-in tool is [`builtin::WebSearchTool`].

pub mod builtin;
pub mod tool;

pub use tool::{Tool, ToolOutput, ToolRegistry};
