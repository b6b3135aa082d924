// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the AI completion backend.

use async_trait::async_trait;

use crate::error::DarkgptError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for AI completion backends.
///
/// A single call sends one request and returns the whole response. Tool-use
/// iteration is driven by the caller, which feeds tool results back as new
/// requests.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest)
    -> Result<ProviderResponse, DarkgptError>;
}
