// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for DarkGPT integration tests.
//!
//! Provides mock adapters and a test harness for fast, deterministic tests
//! without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Scripted AI backend that records every request
//! - [`MockTool`] - Tool with a canned result, optionally unconfigured or failing
//! - [`TestHarness`] - Full chat stack over a temporary SQLite database

pub mod harness;
pub mod mock_provider;
pub mod mock_tool;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{MockProvider, MockReply};
pub use mock_tool::MockTool;
