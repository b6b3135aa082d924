// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for identity verification.

use async_trait::async_trait;

use crate::error::DarkgptError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserProfile;

/// Adapter for resolving session tokens to users.
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Authenticates the given bearer token and returns the owning user.
    async fn authenticate(&self, token: &str) -> Result<UserProfile, DarkgptError>;
}
